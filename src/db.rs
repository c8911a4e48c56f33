// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use directories::ProjectDirs;
use log::{debug, error};
use once_cell::sync::Lazy;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{LedgerError, Result};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Coinjar", "coinjar"));

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("coinjar.sqlite"))
}

/// Resolve the store location (explicit override first, then the platform
/// data dir) and open it.
pub fn open_or_init(override_path: Option<&Path>) -> anyhow::Result<Store> {
    let path = match override_path {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Create data dir {}", parent.display()))?;
            }
            p.to_path_buf()
        }
        None => db_path()?,
    };
    Store::open(&path).with_context(|| format!("Open DB at {}", path.display()))
}

/// Handle to the ledger database. All access goes through one connection;
/// mutating work runs in an IMMEDIATE transaction so the write lock is held
/// for the whole read-modify-write, across processes as well as threads.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_schema(&conn)?;
        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    // A panic mid-unit drops the open transaction, which rolls it back, so
    // the connection behind a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock();
        f(&conn).inspect_err(log_store_fault)
    }

    /// Run `f` as one atomic unit. Nothing is visible unless `f` returns
    /// `Ok` and the commit succeeds.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.lock();
        let res = run_immediate(&mut conn, f);
        if res.is_err() {
            debug!("unit of work rolled back");
        }
        res.inspect_err(log_store_fault)
    }
}

fn run_immediate<T>(
    conn: &mut Connection,
    f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
    // dropping `tx` without commit rolls back
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

fn log_store_fault(err: &LedgerError) {
    if let LedgerError::Store(_) | LedgerError::Corrupt(_) = err {
        error!("store failure: {}", err);
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL CHECK(length(name) > 0),
        kind TEXT NOT NULL CHECK(kind IN ('checking','savings','brokerage')),
        category TEXT NOT NULL DEFAULT 'ASSET' CHECK(category IN ('ASSET','DEBT')),
        balance TEXT,            -- NULL for brokerage
        interest_rate TEXT,      -- savings only
        compounding INTEGER,     -- savings only
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        CHECK((kind = 'brokerage') = (balance IS NULL))
    );

    CREATE TRIGGER IF NOT EXISTS accounts_kind_immutable
    BEFORE UPDATE OF kind ON accounts
    WHEN NEW.kind <> OLD.kind
    BEGIN
        SELECT RAISE(ABORT, 'account kind is immutable');
    END;

    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        account_id TEXT NOT NULL,
        source TEXT NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        note TEXT,
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id, date);

    CREATE TABLE IF NOT EXISTS holdings(
        account_id TEXT NOT NULL,
        ticker TEXT NOT NULL,
        quantity TEXT NOT NULL,
        PRIMARY KEY(account_id, ticker),
        FOREIGN KEY(account_id) REFERENCES accounts(id)
    );
    "#,
    )?;
    Ok(())
}

// Column codecs. Everything is stored as text so decimals stay exact and
// timestamps sort lexically.

/// Years that encode as a fixed-width, four digit RFC 3339 timestamp.
pub(crate) const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| LedgerError::Corrupt(format!("bad timestamp '{}': {}", raw, e)))
}

pub(crate) fn decode_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| LedgerError::Corrupt(format!("bad id '{}': {}", raw, e)))
}

pub(crate) fn decode_decimal(raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|e| LedgerError::Corrupt(format!("bad decimal '{}': {}", raw, e)))
}
