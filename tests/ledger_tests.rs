// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use kasbbook::error::LedgerError;
use kasbbook::ledger::{INSTALLMENT_CATEGORY, Ledger};
use kasbbook::models::CategoryKind;

fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

#[test]
fn create_then_list_round_trip() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    let tx = ledger
        .create_transaction(1, cat.id, 250_000, ts(2024, 3, 20, 10, 30, 0), Some("invoice 12"))
        .unwrap();

    let page = ledger
        .list_transactions(1, ts(2024, 3, 20, 0, 0, 0), ts(2024, 3, 20, 23, 59, 59), None, 10)
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.next.is_none());
    let got = &page.items[0];
    assert_eq!(got.id, tx.id);
    assert_eq!(got.owner_id, 1);
    assert_eq!(got.category_id, cat.id);
    assert_eq!(got.amount, 250_000);
    assert_eq!(got.ts, ts(2024, 3, 20, 10, 30, 0));
    assert_eq!(got.note.as_deref(), Some("invoice 12"));
}

#[test]
fn duplicate_category_name_is_per_owner() {
    let ledger = Ledger::open_in_memory().unwrap();
    ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();

    let err = ledger
        .create_category(1, "Sales", CategoryKind::WorkExpense)
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName(name) if name == "Sales"));

    // Same name is fine for a different owner.
    ledger.create_category(2, "Sales", CategoryKind::Income).unwrap();
}

#[test]
fn invalid_kind_is_rejected_at_parse() {
    let err = CategoryKind::parse("misc").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidKind(k) if k == "misc"));
}

#[test]
fn nonpositive_amounts_are_rejected() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();

    for amount in [0, -1, -500_000] {
        let err = ledger
            .create_transaction(1, cat.id, amount, ts(2024, 3, 20, 0, 0, 0), None)
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountInvalid(a) if a == amount));
    }
}

#[test]
fn category_of_another_owner_is_not_found() {
    let ledger = Ledger::open_in_memory().unwrap();
    let foreign = ledger.create_category(2, "Rent", CategoryKind::WorkExpense).unwrap();

    let err = ledger
        .create_transaction(1, foreign.id, 1000, ts(2024, 3, 20, 0, 0, 0), None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::CategoryNotFound(id) if id == foreign.id));
}

#[test]
fn delete_transaction_is_idempotent_up_to_not_found() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    let tx = ledger
        .create_transaction(1, cat.id, 1000, ts(2024, 3, 20, 0, 0, 0), None)
        .unwrap();

    ledger.delete_transaction(1, tx.id).unwrap();
    let err = ledger.delete_transaction(1, tx.id).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(id) if id == tx.id));
}

#[test]
fn category_delete_blocks_until_unreferenced() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Rent", CategoryKind::WorkExpense).unwrap();
    let tx = ledger
        .create_transaction(1, cat.id, 30_000, ts(2024, 3, 20, 9, 0, 0), None)
        .unwrap();

    let err = ledger.delete_category(1, cat.id).unwrap_err();
    assert!(
        matches!(err, LedgerError::CategoryInUse { id, transactions } if id == cat.id && transactions == 1)
    );

    ledger.delete_transaction(1, tx.id).unwrap();
    ledger.delete_category(1, cat.id).unwrap();
    let err = ledger.category(1, cat.id).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[test]
fn rename_updates_in_place_and_keeps_history() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    ledger.create_category(1, "Rent", CategoryKind::WorkExpense).unwrap();
    let tx = ledger
        .create_transaction(1, cat.id, 1000, ts(2024, 3, 20, 0, 0, 0), None)
        .unwrap();

    let renamed = ledger.rename_category(1, cat.id, "Store sales").unwrap();
    assert_eq!(renamed.id, cat.id);
    assert_eq!(renamed.name, "Store sales");
    assert_eq!(renamed.kind, CategoryKind::Income);

    // Existing transactions still point at the same id.
    assert_eq!(ledger.transaction(1, tx.id).unwrap().category_id, cat.id);

    let err = ledger.rename_category(1, cat.id, "Rent").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName(name) if name == "Rent"));
}

#[test]
fn installment_category_is_seeded_and_locked() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.ensure_installment(1).unwrap();
    assert_eq!(cat.name, INSTALLMENT_CATEGORY);
    assert_eq!(cat.kind, CategoryKind::PersonalExpense);
    assert!(cat.locked);

    // Idempotent: seeding again returns the same row.
    let again = ledger.ensure_installment(1).unwrap();
    assert_eq!(again.id, cat.id);

    let err = ledger.delete_category(1, cat.id).unwrap_err();
    assert!(matches!(err, LedgerError::CategoryLocked(_)));
    let err = ledger.rename_category(1, cat.id, "loan").unwrap_err();
    assert!(matches!(err, LedgerError::CategoryLocked(_)));
}

#[test]
fn listing_orders_by_timestamp_then_id() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();

    // Same timestamp: ids break the tie.
    let a = ledger
        .create_transaction(1, cat.id, 100, ts(2024, 3, 20, 12, 0, 0), None)
        .unwrap();
    let b = ledger
        .create_transaction(1, cat.id, 200, ts(2024, 3, 20, 12, 0, 0), None)
        .unwrap();
    let earlier = ledger
        .create_transaction(1, cat.id, 300, ts(2024, 3, 20, 8, 0, 0), None)
        .unwrap();

    let page = ledger
        .list_transactions(1, ts(2024, 3, 20, 0, 0, 0), ts(2024, 3, 20, 23, 59, 59), None, 10)
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![earlier.id, a.id, b.id]);
}

#[test]
fn cursor_pagination_restarts_where_it_stopped() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    for day in 1..=7 {
        ledger
            .create_transaction(1, cat.id, day as i64 * 100, ts(2024, 4, day, 10, 0, 0), None)
            .unwrap();
    }

    let from = ts(2024, 4, 1, 0, 0, 0);
    let to = ts(2024, 4, 30, 23, 59, 59);

    let first = ledger.list_transactions(1, from, to, None, 3).unwrap();
    assert_eq!(first.items.len(), 3);
    let cursor = first.next.expect("more pages");

    let second = ledger.list_transactions(1, from, to, Some(cursor), 3).unwrap();
    assert_eq!(second.items.len(), 3);
    let cursor = second.next.expect("more pages");

    let third = ledger.list_transactions(1, from, to, Some(cursor), 3).unwrap();
    assert_eq!(third.items.len(), 1);
    assert!(third.next.is_none());

    let mut seen: Vec<i64> = Vec::new();
    seen.extend(first.items.iter().map(|t| t.id));
    seen.extend(second.items.iter().map(|t| t.id));
    seen.extend(third.items.iter().map(|t| t.id));
    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 7, "no row repeated or skipped across pages");
}

#[test]
fn owners_are_isolated() {
    let ledger = Ledger::open_in_memory().unwrap();
    let mine = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    let theirs = ledger.create_category(2, "Sales", CategoryKind::Income).unwrap();
    let tx = ledger
        .create_transaction(2, theirs.id, 900, ts(2024, 3, 20, 0, 0, 0), None)
        .unwrap();

    let page = ledger
        .list_transactions(1, ts(2024, 3, 1, 0, 0, 0), ts(2024, 3, 31, 23, 59, 59), None, 10)
        .unwrap();
    assert!(page.items.is_empty());

    // Owner 1 cannot delete owner 2's rows.
    assert!(matches!(
        ledger.delete_transaction(1, tx.id).unwrap_err(),
        LedgerError::NotFound(_)
    ));
    assert!(matches!(
        ledger.delete_category(1, theirs.id).unwrap_err(),
        LedgerError::NotFound(_)
    ));
    assert_eq!(ledger.list_categories(1, None).unwrap().len(), 1);
    assert_eq!(ledger.list_categories(1, None).unwrap()[0].id, mine.id);
}

#[test]
fn integrity_report_is_clean_on_healthy_ledger() {
    let ledger = Ledger::open_in_memory().unwrap();
    let cat = ledger.create_category(1, "Sales", CategoryKind::Income).unwrap();
    ledger
        .create_transaction(1, cat.id, 100, ts(2024, 3, 20, 0, 0, 0), None)
        .unwrap();
    assert!(ledger.integrity_report().unwrap().is_empty());
}
