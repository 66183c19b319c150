// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kasbbook::commands::transactions;
use kasbbook::ledger::Ledger;
use kasbbook::models::CategoryKind;
use kasbbook::{cli, utils};

fn seeded_ledger() -> Ledger {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(7, "Sales", CategoryKind::Income).unwrap();
    for day in 1..=3 {
        let ts = NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        ledger
            .create_transaction(7, cat.id, day as i64 * 1_000, ts, None)
            .unwrap();
    }
    ledger
}

#[test]
fn list_limit_and_cursor_are_respected() {
    let ledger = seeded_ledger();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["kasbbook", "tx", "list", "--user", "7", "--limit", "2"]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };

    let (rows, next) = transactions::query_rows(&ledger, 7, list_m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "1403/10/12"); // 2025-01-01 in Jalali
    assert_eq!(rows[0].amount, 1_000);
    let cursor = next.expect("third row pending");

    let after = format!("{},{}", cursor.ts.format("%Y-%m-%d %H:%M:%S"), cursor.id);
    let cli = cli::build_cli();
    let matches = cli.get_matches_from([
        "kasbbook", "tx", "list", "--user", "7", "--limit", "2", "--after", &after,
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let (rows, next) = transactions::query_rows(&ledger, 7, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 3_000);
    assert!(next.is_none());
}

#[test]
fn list_respects_date_range_in_either_calendar() {
    let ledger = seeded_ledger();
    let cli = cli::build_cli();
    // 1403/10/13 is 2025-01-02.
    let matches = cli.get_matches_from([
        "kasbbook", "tx", "list", "--user", "7", "--from", "1403/10/13", "--to", "2025-01-02",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let (rows, _) = transactions::query_rows(&ledger, 7, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, 2_000);
    assert_eq!(rows[0].category, "Sales");
    assert_eq!(rows[0].kind, "income");
}

#[test]
fn amounts_parse_with_separators_and_format_back() {
    assert_eq!(utils::parse_amount("1,250,000").unwrap(), 1_250_000);
    assert_eq!(utils::parse_amount("30_000").unwrap(), 30_000);
    assert!(utils::parse_amount("12.5").is_err());
    assert_eq!(utils::fmt_amount(1_250_000), "1,250,000");
    assert_eq!(utils::fmt_amount(-45_000), "-45,000");
    assert_eq!(utils::fmt_amount(900), "900");
}

#[test]
fn flexible_date_parsing_accepts_both_calendars() {
    let d = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    assert_eq!(utils::parse_date_flex("2024-03-20").unwrap(), d);
    assert_eq!(utils::parse_date_flex("1403/01/01").unwrap(), d);
    assert!(utils::parse_date_flex("yesterday").is_err());
}
