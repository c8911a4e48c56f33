// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::ledger::Ledger;
use crate::utils::{fmt_money, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let drifts = if fix {
        ledger.resync_balances()?
    } else {
        ledger.check_balances()?
    };

    if drifts.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = drifts
        .iter()
        .map(|d| {
            vec![
                "balance_drift".to_string(),
                format!("{} ({})", d.name, d.account_id),
                fmt_money(&d.stored),
                fmt_money(&d.computed),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Issue", "Account", "Stored", "Transactions"], rows)
    );
    if fix {
        println!("Repaired {} account balances", drifts.len());
    }
    Ok(())
}
