// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::Calendar;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{CategoryKind, PeriodSummary, ReportScope};

/// Page size for the aggregation scan. Reports stream through the
/// store's cursor so a large period never loads all rows at once.
const SCAN_PAGE: usize = 500;

pub fn day_start(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// Last stored instant of a civil day. Transactions are written with
/// whole-second precision, so a row at exactly 23:59:59 belongs to this
/// day and never to the next.
pub fn day_end(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(23, 59, 59).unwrap_or_else(|| d.and_time(NaiveTime::MIN))
}

/// Widest range the store can hold; used for all-time totals.
pub fn all_time_bounds() -> Option<(NaiveDateTime, NaiveDateTime)> {
    let from = NaiveDate::from_ymd_opt(1, 1, 1)?;
    let to = NaiveDate::from_ymd_opt(9999, 12, 31)?;
    Some((day_start(from), day_end(to)))
}

/// Summary for the day/month/year containing `anchor`, with boundaries
/// taken from the supplied calendar.
pub fn period_summary(
    ledger: &Ledger,
    calendar: &dyn Calendar,
    owner_id: i64,
    scope: ReportScope,
    anchor: NaiveDate,
) -> Result<PeriodSummary> {
    let (start, end) = calendar.period_bounds(scope, anchor)?;
    let key = calendar.period_key(scope, anchor);
    summarize(ledger, owner_id, day_start(start), day_end(end), key)
}

/// Summary over an arbitrary inclusive date range.
pub fn range_summary(
    ledger: &Ledger,
    calendar: &dyn Calendar,
    owner_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodSummary> {
    let key = format!("{}..{}", calendar.format_date(from), calendar.format_date(to));
    summarize(ledger, owner_id, day_start(from), day_end(to), key)
}

/// Running totals over the whole ledger.
pub fn all_time_summary(ledger: &Ledger, owner_id: i64) -> Result<PeriodSummary> {
    match all_time_bounds() {
        Some((start, end)) => summarize(ledger, owner_id, start, end, "all-time".into()),
        None => Ok(PeriodSummary::empty("all-time".into())),
    }
}

/// Read-only fold over committed rows: each transaction lands in exactly
/// one bucket according to its category's kind. Zero rows in range is a
/// valid, all-zero summary.
fn summarize(
    ledger: &Ledger,
    owner_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    period: String,
) -> Result<PeriodSummary> {
    let kinds: HashMap<i64, CategoryKind> = ledger
        .list_categories(owner_id, None)?
        .into_iter()
        .map(|c| (c.id, c.kind))
        .collect();

    let mut income = 0i64;
    let mut work_expense = 0i64;
    let mut personal_expense = 0i64;

    let mut cursor = None;
    loop {
        let page = ledger.list_transactions(owner_id, start, end, cursor, SCAN_PAGE)?;
        for tx in &page.items {
            match kinds.get(&tx.category_id) {
                Some(CategoryKind::Income) => income += tx.amount,
                Some(CategoryKind::WorkExpense) => work_expense += tx.amount,
                Some(CategoryKind::PersonalExpense) => personal_expense += tx.amount,
                // Row orphaned by a concurrent category change; the
                // doctor sweep surfaces these.
                None => {}
            }
        }
        match page.next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    Ok(PeriodSummary::new(period, income, work_expense, personal_expense))
}
