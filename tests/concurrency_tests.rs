// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use coinjar::Ledger;
use coinjar::models::{NewAccount, NewTransaction};
use rust_decimal::Decimal;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;
use uuid::Uuid;

fn deposit(account_id: Uuid, amount: i64) -> NewTransaction {
    NewTransaction {
        account_id,
        source: "Transfer".into(),
        date: Utc::now(),
        amount: Decimal::from(amount),
        note: None,
    }
}

#[test]
fn shared_ledger_does_not_lose_updates() {
    let ledger = Arc::new(Ledger::open_in_memory().unwrap());
    let id = ledger
        .create_account(NewAccount {
            initial_balance: Decimal::from(100),
            ..NewAccount::new("Checking", "checking")
        })
        .unwrap()
        .id();

    let workers = 8;
    let rounds = 25;
    let barrier = Arc::new(Barrier::new(workers));
    let handles: Vec<_> = (0..workers)
        .map(|w| {
            let ledger = Arc::clone(&ledger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let amount = if w % 2 == 0 { 10 } else { -10 };
                for _ in 0..rounds {
                    ledger.create_transaction(deposit(id, amount)).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let account = ledger.get_account(id).unwrap();
    assert_eq!(account.balance(), Some(Decimal::from(100)));
    assert_eq!(
        ledger.list_transactions_by_account(id).unwrap().len(),
        1 + workers * rounds
    );
    assert!(ledger.check_balances().unwrap().is_empty());
}

#[test]
fn separate_handles_on_one_file_serialize_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.sqlite");
    let id = Ledger::open(&path)
        .unwrap()
        .create_account(NewAccount::new("Checking", "checking"))
        .unwrap()
        .id();

    let handles: Vec<_> = [10, -10, 10, -10]
        .into_iter()
        .map(|amount| {
            let path = path.clone();
            thread::spawn(move || {
                let ledger = Ledger::open(&path).unwrap();
                for _ in 0..20 {
                    ledger.create_transaction(deposit(id, amount)).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let ledger = Ledger::open(&path).unwrap();
    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::ZERO)
    );
    assert_eq!(ledger.list_transactions().unwrap().len(), 80);
}

#[test]
fn concurrent_create_and_delete_keep_balance_consistent() {
    let ledger = Arc::new(Ledger::open_in_memory().unwrap());
    let id = ledger
        .create_account(NewAccount::new("Savings", "savings"))
        .unwrap()
        .id();
    let seeded: Vec<Uuid> = (0..20)
        .map(|_| ledger.create_transaction(deposit(id, 5)).unwrap().id)
        .collect();

    let deleter = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            for t in seeded {
                ledger.delete_transaction(t).unwrap();
            }
        })
    };
    let creator = {
        let ledger = Arc::clone(&ledger);
        thread::spawn(move || {
            for _ in 0..20 {
                ledger.create_transaction(deposit(id, 3)).unwrap();
            }
        })
    };
    deleter.join().unwrap();
    creator.join().unwrap();

    assert_eq!(
        ledger.get_account(id).unwrap().balance(),
        Some(Decimal::from(60))
    );
    assert!(ledger.check_balances().unwrap().is_empty());
}
