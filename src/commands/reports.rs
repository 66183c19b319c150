// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::commands::resolve_owner;
use crate::ledger::Ledger;
use crate::models::{PeriodSummary, ReportScope};
use crate::report;
use crate::utils::{calendar_by_name, fmt_amount, maybe_print_json, parse_date_flex, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, sub)?,
        Some(("range", sub)) => range(ledger, sub)?,
        Some(("all", sub)) => all(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let scope = ReportScope::parse(sub.get_one::<String>("scope").unwrap())?;
    let calendar = calendar_by_name(sub.get_one::<String>("calendar").unwrap());
    let anchor = match sub.get_one::<String>("date") {
        Some(s) => parse_date_flex(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let s = report::period_summary(ledger, calendar.as_ref(), owner, scope, anchor)?;
    render(sub, &s)
}

fn range(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let calendar = calendar_by_name(sub.get_one::<String>("calendar").unwrap());
    let from = parse_date_flex(sub.get_one::<String>("from").unwrap())?;
    let to = parse_date_flex(sub.get_one::<String>("to").unwrap())?;
    let s = report::range_summary(ledger, calendar.as_ref(), owner, from, to)?;
    render(sub, &s)
}

fn all(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let owner = resolve_owner(ledger, sub)?;
    let s = report::all_time_summary(ledger, owner)?;
    render(sub, &s)
}

fn render(sub: &clap::ArgMatches, s: &PeriodSummary) -> Result<()> {
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), s)? {
        let rows = vec![vec![
            s.period.clone(),
            fmt_amount(s.income),
            fmt_amount(s.work_expense),
            fmt_amount(s.personal_expense),
            fmt_amount(s.net),
            format!("{}", s.savings_rate),
        ]];
        println!(
            "{}",
            pretty_table(
                &["Period", "Income", "Work expense", "Personal expense", "Net", "Savings rate"],
                rows,
            )
        );
    }
    Ok(())
}
