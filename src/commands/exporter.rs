// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use serde_json::json;

use crate::commands::resolve_owner;
use crate::ledger::Ledger;
use crate::report;
use crate::utils::{calendar_by_name, parse_date_flex};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ledger, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let calendar = calendar_by_name(sub.get_one::<String>("calendar").unwrap());

    let (all_from, all_to) = match report::all_time_bounds() {
        Some(b) => b,
        None => bail!("calendar range unavailable"),
    };
    let from = match sub.get_one::<String>("from") {
        Some(s) => report::day_start(parse_date_flex(s)?),
        None => all_from,
    };
    let to = match sub.get_one::<String>("to") {
        Some(s) => report::day_end(parse_date_flex(s)?),
        None => all_to,
    };

    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let categories = ledger.list_categories(owner, None)?;
    let lookup = |id: i64| categories.iter().find(|c| c.id == id);

    let mut csv_wtr = None;
    let mut json_items = Vec::new();
    if fmt == "csv" {
        let mut w = csv::Writer::from_path(out)?;
        w.write_record(["id", "date", "time", "category", "kind", "amount", "note"])?;
        csv_wtr = Some(w);
    }

    let mut exported = 0usize;
    let mut cursor = None;
    loop {
        let page = ledger.list_transactions(owner, from, to, cursor, 500)?;
        for t in &page.items {
            let cat = lookup(t.category_id);
            let date = calendar.format_date(t.ts.date());
            let time = t.ts.time().to_string();
            let name = cat.map(|c| c.name.clone()).unwrap_or_default();
            let kind = cat.map(|c| c.kind.to_string()).unwrap_or_default();
            let note = t.note.clone().unwrap_or_default();
            match csv_wtr.as_mut() {
                Some(w) => w.write_record([
                    t.id.to_string(),
                    date,
                    time,
                    name,
                    kind,
                    t.amount.to_string(),
                    note,
                ])?,
                None => json_items.push(json!({
                    "id": t.id,
                    "date": date,
                    "time": time,
                    "category": name,
                    "kind": kind,
                    "amount": t.amount,
                    "note": note,
                })),
            }
            exported += 1;
        }
        match page.next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    match csv_wtr {
        Some(mut w) => w.flush()?,
        None => std::fs::write(out, serde_json::to_string_pretty(&json_items)?)?,
    }
    println!("Exported {} transactions to {}", exported, out);
    Ok(())
}
