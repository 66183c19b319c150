// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::access;
use crate::ledger::Ledger;

pub mod access_ctl;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod transactions;

/// Resolves the `--user` argument to the ledger owner the command acts
/// on, enforcing the configured access policy.
pub(crate) fn resolve_owner(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<i64> {
    let user = *sub.get_one::<i64>("user").unwrap();
    Ok(access::resolve_owner(ledger, user)?)
}
