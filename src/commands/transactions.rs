// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

use super::{arg, id_arg};
use crate::ledger::Ledger;
use crate::models::NewTransaction;
use crate::utils::{
    fmt_money, maybe_print_json, parse_decimal, parse_id, parse_timestamp, pretty_table,
};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => remove(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let req = NewTransaction {
        account_id: id_arg(sub, "account")?,
        source: arg(sub, "source")?.to_string(),
        date: parse_timestamp(arg(sub, "date")?)?,
        amount: parse_decimal(arg(sub, "amount")?)?,
        note: sub.get_one::<String>("note").cloned(),
    };
    let txn = ledger.create_transaction(req)?;
    println!(
        "Recorded {} on {} from '{}' ({})",
        txn.amount,
        txn.date.date_naive(),
        txn.source,
        txn.id
    );
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.account.clone(),
                    r.source.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Account", "Source", "Amount", "Note", "Id"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub source: String,
    pub amount: String,
    pub note: String,
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let txns = match sub.get_one::<String>("account") {
        Some(raw) => ledger.list_transactions_by_account(parse_id(raw)?)?,
        None => ledger.list_transactions()?,
    };
    let names: HashMap<_, _> = ledger
        .list_accounts()?
        .into_iter()
        .map(|a| (a.id(), a.name().to_string()))
        .collect();
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(txns
        .into_iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.date_naive().to_string(),
            account: names
                .get(&t.account_id)
                .cloned()
                .unwrap_or_else(|| t.account_id.to_string()),
            source: t.source,
            amount: fmt_money(&t.amount),
            note: t.note.unwrap_or_default(),
        })
        .collect())
}

fn remove(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_arg(sub, "id")?;
    ledger.delete_transaction(id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
