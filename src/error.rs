// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Error taxonomy surfaced to the command surface. The library never
/// retries or recovers on its own; transient storage failures bubble up
/// through `Storage`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("category '{0}' already exists for this owner")]
    DuplicateName(String),

    #[error("unknown category kind '{0}' (expected income|work-expense|personal-expense)")]
    InvalidKind(String),

    #[error("amount must be a positive number of minor units, got {0}")]
    AmountInvalid(i64),

    #[error("category {0} not found for this owner")]
    CategoryNotFound(i64),

    #[error("category {id} is still referenced by {transactions} transaction(s)")]
    CategoryInUse { id: i64, transactions: u64 },

    #[error("category '{0}' is locked and cannot be changed or removed")]
    CategoryLocked(String),

    #[error("invalid report scope '{0}' (expected day|month|year)")]
    InvalidScope(String),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("user {0} is not allowed to use this ledger")]
    AccessDenied(i64),

    #[error("no record with id {0}")]
    NotFound(i64),

    #[error("storage unavailable: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
