// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{decode_decimal, decode_timestamp, decode_uuid, encode_timestamp};
use crate::error::{LedgerError, Result};
use crate::ledger::accounts;
use crate::models::Transaction;

const SELECT_TRANSACTION: &str =
    "SELECT id, account_id, source, date, amount, note FROM transactions";

// Newest first; `seq` breaks date ties by insertion order so repeated
// listings agree.
const NEWEST_FIRST: &str = "ORDER BY date DESC, seq DESC";

struct TransactionRow {
    id: String,
    account_id: String,
    source: String,
    date: String,
    amount: String,
    note: Option<String>,
}

impl TransactionRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(TransactionRow {
            id: r.get(0)?,
            account_id: r.get(1)?,
            source: r.get(2)?,
            date: r.get(3)?,
            amount: r.get(4)?,
            note: r.get(5)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction> {
        Ok(Transaction {
            id: decode_uuid(&self.id)?,
            account_id: decode_uuid(&self.account_id)?,
            source: self.source,
            date: decode_timestamp(&self.date)?,
            amount: decode_decimal(&self.amount)?,
            note: self.note,
        })
    }
}

fn collect(
    stmt: &mut rusqlite::CachedStatement<'_>,
    p: impl rusqlite::Params,
) -> Result<Vec<Transaction>> {
    let rows = stmt.query_map(p, TransactionRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_transaction()?);
    }
    Ok(out)
}

/// Insert a transaction against a cash account. Does not touch the balance.
pub fn record(conn: &Connection, txn: &Transaction) -> Result<()> {
    let account = accounts::require(conn, txn.account_id)?;
    if !account.is_cash_account() {
        return Err(LedgerError::UnsupportedAccountType {
            id: account.id(),
            kind: account.kind(),
        });
    }
    conn.execute(
        "INSERT INTO transactions(id, account_id, source, date, amount, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            txn.id.to_string(),
            txn.account_id.to_string(),
            txn.source,
            encode_timestamp(&txn.date),
            txn.amount.to_string(),
            txn.note
        ],
    )?;
    Ok(())
}

pub fn find(conn: &Connection, id: Uuid) -> Result<Option<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_TRANSACTION} WHERE id=?1"))?;
    let row = stmt
        .query_row(params![id.to_string()], TransactionRow::from_row)
        .optional()?;
    row.map(TransactionRow::into_transaction).transpose()
}

/// Delete one transaction and hand it back so the caller can reverse its
/// effect on the balance.
pub fn remove(conn: &Connection, id: Uuid) -> Result<Transaction> {
    let txn = find(conn, id)?.ok_or(LedgerError::TransactionNotFound(id))?;
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id.to_string()])?;
    Ok(txn)
}

pub fn list_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_TRANSACTION} {NEWEST_FIRST}"))?;
    collect(&mut stmt, [])
}

pub fn list_by_account(conn: &Connection, account_id: Uuid) -> Result<Vec<Transaction>> {
    let mut stmt =
        conn.prepare_cached(&format!("{SELECT_TRANSACTION} WHERE account_id=?1 {NEWEST_FIRST}"))?;
    collect(&mut stmt, params![account_id.to_string()])
}

/// Oldest first, for running balances.
pub fn list_by_account_chronological(
    conn: &Connection,
    account_id: Uuid,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare_cached(&format!(
        "{SELECT_TRANSACTION} WHERE account_id=?1 ORDER BY date ASC, seq ASC"
    ))?;
    collect(&mut stmt, params![account_id.to_string()])
}

pub fn count_for_account(conn: &Connection, account_id: Uuid) -> Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
        params![account_id.to_string()],
        |r| r.get(0),
    )?;
    Ok(n as u64)
}

pub fn sum_for_account(conn: &Connection, account_id: Uuid) -> Result<Decimal> {
    let mut stmt = conn.prepare_cached("SELECT amount FROM transactions WHERE account_id=?1")?;
    let rows = stmt.query_map(params![account_id.to_string()], |r| r.get::<_, String>(0))?;
    let mut total = Decimal::ZERO;
    for raw in rows {
        total = total.checked_add(decode_decimal(&raw?)?).ok_or_else(|| {
            LedgerError::validation(format!(
                "Transaction total of account {} overflows the decimal range",
                account_id
            ))
        })?;
    }
    Ok(total)
}

pub(crate) fn delete_for_account(conn: &Connection, account_id: Uuid) -> Result<u64> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE account_id=?1",
        params![account_id.to_string()],
    )?;
    Ok(n as u64)
}
