// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::decode_decimal;
use crate::error::{LedgerError, Result};
use crate::ledger::accounts;
use crate::models::{AccountKind, AssetHolding};

fn require_brokerage(conn: &Connection, account_id: Uuid) -> Result<()> {
    let account = accounts::require(conn, account_id)?;
    match account.kind() {
        AccountKind::Brokerage => Ok(()),
        kind => Err(LedgerError::UnsupportedAccountType {
            id: account_id,
            kind,
        }),
    }
}

pub(crate) fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(LedgerError::validation("Ticker is required"));
    }
    Ok(ticker)
}

pub fn upsert(
    conn: &Connection,
    account_id: Uuid,
    ticker: &str,
    quantity: Decimal,
) -> Result<AssetHolding> {
    let ticker = normalize_ticker(ticker)?;
    if quantity < Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "Quantity for {} must not be negative (got {})",
            ticker, quantity
        )));
    }
    require_brokerage(conn, account_id)?;
    conn.execute(
        "INSERT INTO holdings(account_id, ticker, quantity) VALUES (?1, ?2, ?3)
         ON CONFLICT(account_id, ticker) DO UPDATE SET quantity=excluded.quantity",
        params![account_id.to_string(), ticker, quantity.to_string()],
    )?;
    Ok(AssetHolding {
        account_id,
        ticker,
        quantity,
    })
}

pub fn remove(conn: &Connection, account_id: Uuid, ticker: &str) -> Result<AssetHolding> {
    let ticker = normalize_ticker(ticker)?;
    require_brokerage(conn, account_id)?;
    let qty: Option<String> = conn
        .query_row(
            "DELETE FROM holdings WHERE account_id=?1 AND ticker=?2 RETURNING quantity",
            params![account_id.to_string(), ticker],
            |r| r.get(0),
        )
        .optional()?;
    match qty {
        Some(qty) => Ok(AssetHolding {
            account_id,
            ticker,
            quantity: decode_decimal(&qty)?,
        }),
        None => Err(LedgerError::HoldingNotFound { account_id, ticker }),
    }
}

pub fn list(conn: &Connection, account_id: Uuid) -> Result<Vec<AssetHolding>> {
    require_brokerage(conn, account_id)?;
    let mut stmt = conn.prepare_cached(
        "SELECT ticker, quantity FROM holdings WHERE account_id=?1 ORDER BY ticker",
    )?;
    let rows = stmt.query_map(params![account_id.to_string()], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (ticker, qty) = row?;
        out.push(AssetHolding {
            account_id,
            ticker,
            quantity: decode_decimal(&qty)?,
        });
    }
    Ok(out)
}

pub(crate) fn delete_for_account(conn: &Connection, account_id: Uuid) -> Result<u64> {
    let n = conn.execute(
        "DELETE FROM holdings WHERE account_id=?1",
        params![account_id.to_string()],
    )?;
    Ok(n as u64)
}
