// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Serialize;

use crate::commands::resolve_owner;
use crate::ledger::Ledger;
use crate::models::TxCursor;
use crate::report;
use crate::utils::{
    calendar_by_name, fmt_amount, maybe_print_json, parse_amount, parse_cursor_ts,
    parse_date_flex, parse_time, pretty_table,
};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let category_id = *sub.get_one::<i64>("category").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date_flex(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let time = match sub.get_one::<String>("time") {
        Some(s) => parse_time(s)?,
        None => NaiveTime::MIN,
    };
    let note = sub.get_one::<String>("note").map(|s| s.as_str());

    let tx = ledger.create_transaction(owner, category_id, amount, date.and_time(time), note)?;
    println!(
        "Recorded {} in category {} at {} (tx {})",
        fmt_amount(tx.amount),
        tx.category_id,
        tx.ts,
        tx.id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub category: String,
    pub kind: String,
    pub amount: i64,
    pub note: String,
}

/// One page of rows for the table/JSON output, plus the cursor to pass
/// back via `--after` when more rows remain.
pub fn query_rows(
    ledger: &Ledger,
    owner: i64,
    sub: &clap::ArgMatches,
) -> Result<(Vec<TransactionRow>, Option<TxCursor>)> {
    let (all_from, all_to) =
        report::all_time_bounds().context("calendar range unavailable")?;
    let from = match sub.get_one::<String>("from") {
        Some(s) => report::day_start(parse_date_flex(s)?),
        None => all_from,
    };
    let to = match sub.get_one::<String>("to") {
        Some(s) => report::day_end(parse_date_flex(s)?),
        None => all_to,
    };
    let limit = *sub.get_one::<usize>("limit").unwrap();
    let cursor = match sub.get_one::<String>("after") {
        Some(s) => Some(parse_after(s)?),
        None => None,
    };
    let calendar = calendar_by_name(sub.get_one::<String>("calendar").unwrap());

    let categories = ledger.list_categories(owner, None)?;
    let page = ledger.list_transactions(owner, from, to, cursor, limit)?;
    let rows = page
        .items
        .iter()
        .map(|t| {
            let cat = categories.iter().find(|c| c.id == t.category_id);
            TransactionRow {
                id: t.id,
                date: calendar.format_date(t.ts.date()),
                time: t.ts.time().to_string(),
                category: cat.map(|c| c.name.clone()).unwrap_or_default(),
                kind: cat.map(|c| c.kind.to_string()).unwrap_or_default(),
                amount: t.amount,
                note: t.note.clone().unwrap_or_default(),
            }
        })
        .collect();
    Ok((rows, page.next))
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let (data, next) = query_rows(ledger, owner, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.time.clone(),
                    r.category.clone(),
                    r.kind.clone(),
                    fmt_amount(r.amount),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Time", "Category", "Kind", "Amount", "Note"],
                rows,
            )
        );
        if let Some(cur) = next {
            println!(
                "More rows available; continue with --after '{},{}'",
                cur.ts.format("%Y-%m-%d %H:%M:%S"),
                cur.id
            );
        }
    }
    Ok(())
}

fn rm(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    ledger.delete_transaction(owner, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}

fn parse_after(s: &str) -> Result<TxCursor> {
    let (ts_s, id_s) = s
        .rsplit_once(',')
        .with_context(|| format!("Invalid cursor '{}', expected 'TS,id'", s))?;
    Ok(TxCursor {
        ts: parse_cursor_ts(ts_s)?,
        id: id_s.trim().parse().with_context(|| format!("Invalid cursor id '{}'", id_s))?,
    })
}
