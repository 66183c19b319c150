// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::commands::resolve_owner;
use crate::ledger::Ledger;
use crate::models::CategoryKind;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rename", sub)) => rename(ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    ledger.ensure_installment(owner)?;
    let name = sub.get_one::<String>("name").unwrap();
    let kind = CategoryKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let cat = ledger.create_category(owner, name, kind)?;
    println!("Added category '{}' ({}) with id {}", cat.name, cat.kind, cat.id);
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    ledger.ensure_installment(owner)?;
    let kind = match sub.get_one::<String>("kind") {
        Some(s) => Some(CategoryKind::parse(s)?),
        None => None,
    };
    let cats = ledger.list_categories(owner, kind)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        let rows = cats
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.kind.to_string(),
                    if c.locked { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Kind", "Locked"], rows));
    }
    Ok(())
}

fn rename(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let cat = ledger.rename_category(owner, id, name)?;
    println!("Renamed category {} to '{}'", cat.id, cat.name);
    Ok(())
}

fn rm(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    ledger.delete_category(owner, id)?;
    println!("Removed category {}", id);
    Ok(())
}
