// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, id_arg};
use crate::ledger::Ledger;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let account_id = id_arg(sub, "account")?;
    let quantity = parse_decimal(arg(sub, "quantity")?)?;
    let holding = ledger.set_holding(account_id, arg(sub, "ticker")?, quantity)?;
    println!("Holding {} x {}", holding.ticker, holding.quantity);
    Ok(())
}

fn remove(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let removed = ledger.remove_holding(id_arg(sub, "account")?, arg(sub, "ticker")?)?;
    println!("Removed holding {} x {}", removed.ticker, removed.quantity);
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let holdings = ledger.list_holdings(id_arg(sub, "account")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &holdings)? {
        let rows = holdings
            .into_iter()
            .map(|h| vec![h.ticker, format!("{:.4}", h.quantity)])
            .collect();
        println!("{}", pretty_table(&["Ticker", "Qty"], rows));
    }
    Ok(())
}
