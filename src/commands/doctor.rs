// Copyright (c) 2025 KasbBook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::ledger::Ledger;
use crate::utils::pretty_table;

pub fn handle(ledger: &Ledger) -> Result<()> {
    let issues = ledger.integrity_report()?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
