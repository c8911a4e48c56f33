// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::id_arg;
use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn interest(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let summary = ledger.interest_summary(id_arg(sub, "account")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        println!(
            "{}",
            pretty_table(
                &["Account", "Payout / period", "APY factor"],
                vec![vec![
                    summary.account_id.to_string(),
                    format!("{:.2}", summary.periodic_payout),
                    format!("{:.4}", summary.effective_annual_yield),
                ]],
            )
        );
    }
    Ok(())
}

pub fn net_worth(ledger: &Ledger) -> Result<()> {
    println!("Net worth: {}", fmt_money(&ledger.net_worth()?));
    Ok(())
}

pub fn history(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let points = ledger.balance_history(id_arg(sub, "account")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let rows = points
            .iter()
            .map(|p| {
                vec![
                    p.date.date_naive().to_string(),
                    fmt_money(&p.amount),
                    fmt_money(&p.balance),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Amount", "Balance"], rows));
    }
    Ok(())
}
