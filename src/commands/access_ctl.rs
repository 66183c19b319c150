// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::access::{self, AccessMode};
use crate::ledger::Ledger;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("mode", sub)) => mode(ledger, sub)?,
        Some(("share", sub)) => share(ledger, sub)?,
        Some(("primary", sub)) => primary(ledger, sub)?,
        Some(("admin", sub)) => admin(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn mode(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(value) = sub.get_one::<String>("set") {
        let mode = AccessMode::parse(value)
            .with_context(|| format!("Unknown access mode '{}'", value))?;
        access::set_access_mode(ledger, mode)?;
        println!("Access mode set to {}", mode.as_str());
    } else {
        println!("Access mode: {}", access::access_mode(ledger)?.as_str());
    }
    Ok(())
}

fn share(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(value) = sub.get_one::<String>("set") {
        let enabled = value == "on";
        access::set_share_enabled(ledger, enabled)?;
        println!("Shared bookkeeping {}", if enabled { "enabled" } else { "disabled" });
    } else {
        let enabled = access::share_enabled(ledger)?;
        println!("Shared bookkeeping: {}", if enabled { "on" } else { "off" });
    }
    Ok(())
}

fn primary(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(id) = sub.get_one::<i64>("id") {
        let name = sub.get_one::<String>("name").unwrap();
        access::set_primary_admin(ledger, *id, name)?;
        println!("Primary admin set to {}", id);
    } else {
        match access::primary_admin(ledger)? {
            Some(id) => println!("Primary admin: {}", id),
            None => println!("Primary admin not set"),
        }
    }
    Ok(())
}

fn admin(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            access::add_admin(ledger, id, name)?;
            println!("Added admin {} ({})", id, name);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            access::remove_admin(ledger, id)?;
            println!("Removed admin {}", id);
        }
        Some(("list", sub)) => {
            let admins = access::list_admins(ledger)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &admins)? {
                let rows = admins
                    .iter()
                    .map(|a| vec![a.user_id.to_string(), a.name.clone()])
                    .collect();
                println!("{}", pretty_table(&["User id", "Name"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
