// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use kasbbook::access::{self, AccessMode};
use kasbbook::commands::exporter;
use kasbbook::ledger::Ledger;
use kasbbook::models::CategoryKind;
use kasbbook::cli;
use serde_json::json;
use tempfile::tempdir;

fn seeded_ledger() -> Ledger {
    let ledger = Ledger::open_in_memory().unwrap();
    access::set_access_mode(&ledger, AccessMode::Public).unwrap();
    let sales = ledger.create_category(7, "Sales", CategoryKind::Income).unwrap();
    let rent = ledger.create_category(7, "Rent", CategoryKind::WorkExpense).unwrap();
    let d = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    ledger
        .create_transaction(7, sales.id, 100_000, d.and_hms_opt(9, 0, 0).unwrap(), Some("opening day"))
        .unwrap();
    ledger
        .create_transaction(7, rent.id, 30_000, d.and_hms_opt(14, 30, 0).unwrap(), None)
        .unwrap();
    ledger
}

fn run_export(ledger: &Ledger, args: &[&str]) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(args.iter().copied());
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(ledger, export_m)
}

#[test]
fn csv_export_writes_jalali_dates() {
    let ledger = seeded_ledger();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &ledger,
        &[
            "kasbbook",
            "export",
            "transactions",
            "--user",
            "7",
            "--format",
            "csv",
            "--out",
            &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "id,date,time,category,kind,amount,note");
    assert_eq!(lines[1], "1,1403/01/01,09:00:00,Sales,income,100000,opening day");
    assert_eq!(lines[2], "2,1403/01/01,14:30:00,Rent,work_expense,30000,");
}

#[test]
fn json_export_round_trips() {
    let ledger = seeded_ledger();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &ledger,
        &[
            "kasbbook",
            "export",
            "transactions",
            "--user",
            "7",
            "--format",
            "json",
            "--calendar",
            "gregorian",
            "--out",
            &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "date": "2024-03-20",
                "time": "09:00:00",
                "category": "Sales",
                "kind": "income",
                "amount": 100000,
                "note": "opening day"
            },
            {
                "id": 2,
                "date": "2024-03-20",
                "time": "14:30:00",
                "category": "Rent",
                "kind": "work_expense",
                "amount": 30000,
                "note": ""
            }
        ])
    );
}

#[test]
fn range_filter_limits_the_export() {
    let ledger = seeded_ledger();
    let extra_day = NaiveDate::from_ymd_opt(2024, 4, 25).unwrap();
    let sales_id = ledger.list_categories(7, Some(CategoryKind::Income)).unwrap()[0].id;
    ledger
        .create_transaction(7, sales_id, 5_000, extra_day.and_hms_opt(8, 0, 0).unwrap(), None)
        .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("range.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &ledger,
        &[
            "kasbbook",
            "export",
            "transactions",
            "--user",
            "7",
            "--from",
            "2024-04-01",
            "--to",
            "2024-04-30",
            "--out",
            &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("5000"));
}

#[test]
fn unknown_format_is_rejected_without_writing() {
    let ledger = seeded_ledger();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let res = run_export(
        &ledger,
        &[
            "kasbbook",
            "export",
            "transactions",
            "--user",
            "7",
            "--format",
            "xml",
            "--out",
            &out_str,
        ],
    );
    assert!(res.is_err());
    assert!(!out_path.exists());
}
