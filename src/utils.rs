// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};

use crate::calendar::{Calendar, Gregorian, Jalali};

/// Accepts ISO `YYYY-MM-DD` or Jalali `YYYY/MM/DD` input, the two forms
/// users type. Always returns the Gregorian civil date the store keys on.
pub fn parse_date_flex(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = Gregorian.parse_date(s) {
        return Ok(d);
    }
    Jalali
        .parse_date(s)
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD or Jalali YYYY/MM/DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("Invalid time '{}', expected HH:MM or HH:MM:SS", s))
}

pub fn parse_cursor_ts(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
        .with_context(|| format!("Invalid timestamp '{}', expected YYYY-MM-DD HH:MM:SS", s))
}

/// Amounts are integer minor units; separators are tolerated on input.
pub fn parse_amount(s: &str) -> Result<i64> {
    let cleaned: String = s.chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid amount '{}'", s))
}

pub fn fmt_amount(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn calendar_by_name(name: &str) -> Box<dyn Calendar> {
    match name {
        "gregorian" => Box::new(Gregorian),
        _ => Box::new(Jalali),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
