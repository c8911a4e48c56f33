// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use super::{arg, id_arg};
use crate::ledger::Ledger;
use crate::models::{Account, AccountDetails, NewAccount};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("show", sub)) => show(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let req = NewAccount {
        name: arg(sub, "name")?.to_string(),
        kind: arg(sub, "type")?.to_string(),
        category: arg(sub, "category")?.parse()?,
        initial_balance: match sub.get_one::<String>("balance") {
            Some(raw) => parse_decimal(raw)?,
            None => Default::default(),
        },
        interest_rate: sub
            .get_one::<String>("rate")
            .map(|raw| parse_decimal(raw))
            .transpose()?,
        compounding_periods_per_year: sub.get_one::<u32>("compounding").copied(),
    };
    let account = ledger.create_account(req)?;
    println!(
        "Added {} account '{}' ({})",
        account.kind(),
        account.name(),
        account.id()
    );
    Ok(())
}

pub(crate) fn account_row(a: &Account) -> Vec<String> {
    let (balance, terms) = match a.details() {
        AccountDetails::Checking { balance } => (fmt_money(balance), String::new()),
        AccountDetails::Savings {
            balance,
            interest_rate,
            compounding_periods_per_year,
        } => (
            fmt_money(balance),
            format!("{}% x{}/yr", interest_rate, compounding_periods_per_year),
        ),
        AccountDetails::Brokerage => ("-".to_string(), String::new()),
    };
    vec![
        a.id().to_string(),
        a.name().to_string(),
        a.kind().to_string(),
        a.category().to_string(),
        balance,
        terms,
    ]
}

const HEADERS: [&str; 6] = ["Id", "Name", "Type", "Category", "Balance", "Interest"];

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = ledger.list_accounts()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        let rows = accounts.iter().map(account_row).collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    Ok(())
}

fn show(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let account = ledger.get_account(id_arg(sub, "id")?)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &account)? {
        println!("{}", pretty_table(&HEADERS, vec![account_row(&account)]));
    }
    Ok(())
}

fn remove(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let deleted = ledger.delete_account(id_arg(sub, "id")?)?;
    println!(
        "Deleted account '{}' ({}) with {} transactions",
        deleted.deleted_account.name, deleted.deleted_account.id, deleted.deleted_transactions
    );
    Ok(())
}
