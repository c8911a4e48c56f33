// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

// Failures are injected with SQLite triggers installed through a second
// connection, so the ledger hits a store error halfway through a unit of work.

use chrono::{TimeZone, Utc};
use coinjar::models::{NewAccount, NewTransaction};
use coinjar::{ErrorKind, Ledger, LedgerError};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

fn setup() -> (TempDir, PathBuf, Ledger) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let ledger = Ledger::open(&path).unwrap();
    (dir, path, ledger)
}

fn install(path: &Path, sql: &str) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(sql).unwrap();
}

fn deposit(account_id: Uuid, amount: i64) -> NewTransaction {
    NewTransaction {
        account_id,
        source: "Payroll".into(),
        date: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        amount: Decimal::from(amount),
        note: None,
    }
}

fn raw_count(path: &Path, table: &str) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn failed_balance_write_rolls_back_transaction_insert() {
    let (_dir, path, ledger) = setup();
    let id = ledger
        .create_account(NewAccount::new("Checking", "checking"))
        .unwrap()
        .id();
    ledger.create_transaction(deposit(id, 50)).unwrap();

    install(
        &path,
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF balance ON accounts
         BEGIN SELECT RAISE(ABORT, 'disk on fire'); END;",
    );

    let err = ledger.create_transaction(deposit(id, 25)).unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));
    assert_eq!(err.kind(), ErrorKind::Store);
    assert!(!err.public_message().contains("disk on fire"));

    assert_eq!(raw_count(&path, "transactions"), 1);
    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::from(50))
    );
}

#[test]
fn failed_balance_write_keeps_deleted_transaction() {
    let (_dir, path, ledger) = setup();
    let id = ledger
        .create_account(NewAccount::new("Checking", "checking"))
        .unwrap()
        .id();
    let t = ledger.create_transaction(deposit(id, 50)).unwrap();

    install(
        &path,
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF balance ON accounts
         BEGIN SELECT RAISE(ABORT, 'nope'); END;",
    );

    let err = ledger.delete_transaction(t.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(ledger.list_transactions().unwrap(), vec![t]);
    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::from(50))
    );
}

#[test]
fn failed_account_delete_keeps_its_transactions() {
    let (_dir, path, ledger) = setup();
    let id = ledger
        .create_account(NewAccount::new("Checking", "checking"))
        .unwrap()
        .id();
    for amt in [10, 20, 30] {
        ledger.create_transaction(deposit(id, amt)).unwrap();
    }

    install(
        &path,
        "CREATE TRIGGER fail_account_delete BEFORE DELETE ON accounts
         BEGIN SELECT RAISE(ABORT, 'nope'); END;",
    );

    let err = ledger.delete_account(id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(raw_count(&path, "transactions"), 3);
    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::from(60))
    );
}

#[test]
fn failed_opening_balance_does_not_create_account() {
    let (_dir, path, ledger) = setup();
    install(
        &path,
        "CREATE TRIGGER fail_txn_insert BEFORE INSERT ON transactions
         BEGIN SELECT RAISE(ABORT, 'nope'); END;",
    );

    let err = ledger
        .create_account(NewAccount {
            initial_balance: Decimal::from(500),
            ..NewAccount::new("Checking", "checking")
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);
    assert_eq!(raw_count(&path, "accounts"), 0);

    // zero opening balance never touches the transactions table
    ledger
        .create_account(NewAccount::new("Empty", "checking"))
        .unwrap();
    assert_eq!(raw_count(&path, "accounts"), 1);
}

#[test]
fn store_stays_usable_after_a_rollback() {
    let (_dir, path, ledger) = setup();
    let id = ledger
        .create_account(NewAccount::new("Checking", "checking"))
        .unwrap()
        .id();
    install(
        &path,
        "CREATE TRIGGER fail_balance BEFORE UPDATE OF balance ON accounts
         BEGIN SELECT RAISE(ABORT, 'nope'); END;",
    );
    assert!(ledger.create_transaction(deposit(id, 1)).is_err());

    install(&path, "DROP TRIGGER fail_balance;");
    ledger.create_transaction(deposit(id, 7)).unwrap();
    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::from(7))
    );
}
