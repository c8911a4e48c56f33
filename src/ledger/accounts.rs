// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{decode_decimal, decode_uuid};
use crate::error::{LedgerError, Result};
use crate::models::{Account, AccountCategory, AccountDetails, AccountKind};

const SELECT_ACCOUNT: &str =
    "SELECT id, name, kind, category, balance, interest_rate, compounding FROM accounts";

struct AccountRow {
    id: String,
    name: String,
    kind: String,
    category: String,
    balance: Option<String>,
    interest_rate: Option<String>,
    compounding: Option<i64>,
}

impl AccountRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(AccountRow {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: r.get(2)?,
            category: r.get(3)?,
            balance: r.get(4)?,
            interest_rate: r.get(5)?,
            compounding: r.get(6)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        let id = decode_uuid(&self.id)?;
        let kind: AccountKind = self
            .kind
            .parse()
            .map_err(|_| LedgerError::Corrupt(format!("account {} has kind '{}'", id, self.kind)))?;
        let category: AccountCategory = self.category.parse().map_err(|_| {
            LedgerError::Corrupt(format!("account {} has category '{}'", id, self.category))
        })?;
        let balance = || -> Result<Decimal> {
            let raw = self.balance.as_deref().ok_or_else(|| {
                LedgerError::Corrupt(format!("cash account {} has no balance", id))
            })?;
            decode_decimal(raw)
        };
        let details = match kind {
            AccountKind::Checking => AccountDetails::Checking { balance: balance()? },
            AccountKind::Savings => {
                let interest_rate = match self.interest_rate.as_deref() {
                    Some(raw) => decode_decimal(raw)?,
                    None => Decimal::ZERO,
                };
                let compounding = self.compounding.unwrap_or(0);
                let compounding_periods_per_year = u32::try_from(compounding).map_err(|_| {
                    LedgerError::Corrupt(format!("account {} has compounding {}", id, compounding))
                })?;
                AccountDetails::Savings {
                    balance: balance()?,
                    interest_rate,
                    compounding_periods_per_year,
                }
            }
            AccountKind::Brokerage => AccountDetails::Brokerage,
        };
        Ok(Account::new(id, self.name, category, details))
    }
}

pub fn insert(conn: &Connection, account: &Account) -> Result<()> {
    let (balance, rate, compounding) = match account.details() {
        AccountDetails::Checking { balance } => (Some(balance.to_string()), None, None),
        AccountDetails::Savings {
            balance,
            interest_rate,
            compounding_periods_per_year,
        } => (
            Some(balance.to_string()),
            Some(interest_rate.to_string()),
            Some(i64::from(*compounding_periods_per_year)),
        ),
        AccountDetails::Brokerage => (None, None, None),
    };
    conn.execute(
        "INSERT INTO accounts(id, name, kind, category, balance, interest_rate, compounding)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account.id().to_string(),
            account.name(),
            account.kind().as_str(),
            account.category().as_str(),
            balance,
            rate,
            compounding
        ],
    )?;
    Ok(())
}

/// Single keyed lookup; the stored kind decides the variant.
pub fn resolve(conn: &Connection, id: Uuid) -> Result<Option<Account>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_ACCOUNT} WHERE id=?1"))?;
    let row = stmt
        .query_row(params![id.to_string()], AccountRow::from_row)
        .optional()?;
    row.map(AccountRow::into_account).transpose()
}

pub fn require(conn: &Connection, id: Uuid) -> Result<Account> {
    resolve(conn, id)?.ok_or(LedgerError::AccountNotFound(id))
}

pub fn list(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_ACCOUNT} ORDER BY name, id"))?;
    let rows = stmt.query_map([], AccountRow::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_account()?);
    }
    Ok(out)
}

pub(crate) fn store_balance(conn: &Connection, id: Uuid, balance: Decimal) -> Result<()> {
    let n = conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2 AND balance IS NOT NULL",
        params![balance.to_string(), id.to_string()],
    )?;
    if n == 0 {
        return Err(LedgerError::AccountNotFound(id));
    }
    Ok(())
}

pub(crate) fn delete(conn: &Connection, id: Uuid) -> Result<()> {
    let n = conn.execute("DELETE FROM accounts WHERE id=?1", params![id.to_string()])?;
    if n == 0 {
        return Err(LedgerError::AccountNotFound(id));
    }
    Ok(())
}
