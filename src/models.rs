// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Fixed set of category kinds. Stored explicitly on the category row;
/// a transaction's kind is always derived through its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    WorkExpense,
    PersonalExpense,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [
        CategoryKind::Income,
        CategoryKind::WorkExpense,
        CategoryKind::PersonalExpense,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::WorkExpense => "work_expense",
            CategoryKind::PersonalExpense => "personal_expense",
        }
    }

    pub fn parse(s: &str) -> Result<CategoryKind, LedgerError> {
        match s {
            "income" => Ok(CategoryKind::Income),
            "work_expense" | "work-expense" => Ok(CategoryKind::WorkExpense),
            "personal_expense" | "personal-expense" => Ok(CategoryKind::PersonalExpense),
            other => Err(LedgerError::InvalidKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub kind: CategoryKind,
    /// Locked categories are seeded by the system and refuse rename/delete.
    pub locked: bool,
}

/// A single ledger entry. Amounts are positive integer minor units;
/// whether an entry adds or subtracts is derived from its category kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: i64,
    pub category_id: i64,
    pub amount: i64,
    pub ts: NaiveDateTime,
    pub note: Option<String>,
}

/// Continuation point for paginated transaction listings. Ordering is
/// ascending `(ts, id)`, so the cursor is the last row already seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCursor {
    pub ts: NaiveDateTime,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxPage {
    pub items: Vec<Transaction>,
    pub next: Option<TxCursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportScope {
    Day,
    Month,
    Year,
}

impl ReportScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportScope::Day => "day",
            ReportScope::Month => "month",
            ReportScope::Year => "year",
        }
    }

    pub fn parse(s: &str) -> Result<ReportScope, LedgerError> {
        match s {
            "day" => Ok(ReportScope::Day),
            "month" => Ok(ReportScope::Month),
            "year" => Ok(ReportScope::Year),
            other => Err(LedgerError::InvalidScope(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReportScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived totals for one reporting window. Never persisted; recomputed
/// from transaction rows on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: String,
    pub income: i64,
    pub work_expense: i64,
    pub personal_expense: i64,
    pub net: i64,
    pub savings_rate: Decimal,
}

impl PeriodSummary {
    pub fn new(period: String, income: i64, work_expense: i64, personal_expense: i64) -> Self {
        let net = income - work_expense - personal_expense;
        let savings_rate = if income == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(net) / Decimal::from(income)).round_dp(4)
        };
        PeriodSummary {
            period,
            income,
            work_expense,
            personal_expense,
            net,
            savings_rate,
        }
    }

    pub fn empty(period: String) -> Self {
        PeriodSummary::new(period, 0, 0, 0)
    }
}
