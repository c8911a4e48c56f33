// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Utc};
use log::{debug, info, warn};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;
use uuid::Uuid;

use crate::db::{STORABLE_YEARS, Store};
use crate::error::{LedgerError, Result};
use crate::interest;
use crate::ledger::{accounts, holdings, transactions};
use crate::models::{
    Account, AccountDetails, AccountKind, AccountRef, AssetHolding, BalanceDrift, BalancePoint,
    DEFAULT_COMPOUNDING_PERIODS, DeletedAccount, InterestSummary, NewAccount, NewTransaction,
    Transaction,
};

pub const OPENING_BALANCE_SOURCE: &str = "Opening balance";

/// Entry point for every ledger operation. Owns the store, and is the only
/// code that writes an account balance.
///
/// The store's units of work are not reachable from outside the crate:
///
/// ```compile_fail
/// let store = coinjar::db::Store::open_in_memory().unwrap();
/// store.write(|_tx| Ok(())).unwrap();
/// ```
///
/// and neither are the raw row helpers:
///
/// ```compile_fail
/// use coinjar::ledger::transactions;
/// ```
pub struct Ledger {
    store: Store,
}

impl Ledger {
    pub fn new(store: Store) -> Self {
        Ledger { store }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Ledger::new(Store::open(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Ledger::new(Store::open_in_memory()?))
    }

    // ---- accounts ----

    /// Create an account. A non-zero initial balance on a cash account is
    /// booked as an opening transaction in the same unit of work, so the
    /// balance still equals the sum of its transactions.
    pub fn create_account(&self, req: NewAccount) -> Result<Account> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Account name is required"));
        }
        let kind: AccountKind = req.kind.parse()?;
        if kind != AccountKind::Savings
            && (req.interest_rate.is_some() || req.compounding_periods_per_year.is_some())
        {
            return Err(LedgerError::validation(format!(
                "Interest terms only apply to savings accounts, not {}",
                kind
            )));
        }
        let details = match kind {
            AccountKind::Checking => AccountDetails::Checking {
                balance: Decimal::ZERO,
            },
            AccountKind::Savings => {
                let interest_rate = req.interest_rate.unwrap_or(Decimal::ZERO);
                if interest_rate < Decimal::ZERO {
                    return Err(LedgerError::validation(format!(
                        "Interest rate must not be negative (got {})",
                        interest_rate
                    )));
                }
                let compounding_periods_per_year = req
                    .compounding_periods_per_year
                    .unwrap_or(DEFAULT_COMPOUNDING_PERIODS);
                if compounding_periods_per_year == 0 {
                    return Err(LedgerError::validation(
                        "Compounding periods per year must be at least 1",
                    ));
                }
                AccountDetails::Savings {
                    balance: Decimal::ZERO,
                    interest_rate,
                    compounding_periods_per_year,
                }
            }
            AccountKind::Brokerage => {
                if !req.initial_balance.is_zero() {
                    return Err(LedgerError::validation(
                        "Brokerage accounts do not carry a cash balance",
                    ));
                }
                AccountDetails::Brokerage
            }
        };

        let account = Account::new(Uuid::new_v4(), name.to_string(), req.category, details);
        let opening = req.initial_balance;
        let account = self.store.write(move |tx| {
            accounts::insert(tx, &account)?;
            if opening.is_zero() {
                return Ok(account);
            }
            let txn = Transaction {
                id: Uuid::new_v4(),
                account_id: account.id(),
                source: OPENING_BALANCE_SOURCE.to_string(),
                date: Utc::now(),
                amount: opening,
                note: None,
            };
            post(tx, &txn)
        })?;
        info!(
            "Created {} account '{}' ({})",
            account.kind(),
            account.name(),
            account.id()
        );
        Ok(account)
    }

    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        self.store.read(accounts::list)
    }

    pub fn get_account(&self, id: Uuid) -> Result<Account> {
        self.store.read(|conn| accounts::require(conn, id))
    }

    /// Remove an account with everything that hangs off it, as one unit.
    pub fn delete_account(&self, id: Uuid) -> Result<DeletedAccount> {
        let deleted = self.store.write(|tx| {
            let account = accounts::require(tx, id)?;
            let expected = transactions::count_for_account(tx, id)?;
            let removed = transactions::delete_for_account(tx, id)?;
            if removed != expected {
                return Err(LedgerError::Corrupt(format!(
                    "account {} cascade removed {} of {} transactions",
                    id, removed, expected
                )));
            }
            let dropped_holdings = holdings::delete_for_account(tx, id)?;
            accounts::delete(tx, id)?;
            debug!("cascade for {} dropped {} holdings", id, dropped_holdings);
            Ok(DeletedAccount {
                deleted_account: AccountRef {
                    id: account.id(),
                    name: account.name().to_string(),
                },
                deleted_transactions: removed,
            })
        })?;
        info!(
            "Deleted account: {} ({}) with {} transactions",
            deleted.deleted_account.name, deleted.deleted_account.id, deleted.deleted_transactions
        );
        Ok(deleted)
    }

    // ---- transactions ----

    pub fn create_transaction(&self, req: NewTransaction) -> Result<Transaction> {
        let source = req.source.trim();
        if source.is_empty() {
            return Err(LedgerError::validation("Transaction source is required"));
        }
        if !STORABLE_YEARS.contains(&req.date.year()) {
            return Err(LedgerError::validation(format!(
                "Transaction date {} is outside years {:04}-{:04}",
                req.date,
                STORABLE_YEARS.start(),
                STORABLE_YEARS.end()
            )));
        }
        let txn = Transaction {
            id: Uuid::new_v4(),
            account_id: req.account_id,
            source: source.to_string(),
            date: req.date,
            amount: req.amount,
            note: req
                .note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };
        let balance = self.store.write(|tx| {
            let account = post(tx, &txn)?;
            Ok(account.balance().unwrap_or_default())
        })?;
        info!(
            "Recorded {} on {} from '{}' (acct {}, balance now {})",
            txn.amount,
            txn.date.date_naive(),
            txn.source,
            txn.account_id,
            balance
        );
        Ok(txn)
    }

    pub fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let removed = self.store.write(|tx| {
            let removed = transactions::remove(tx, id)?;
            let mut account = accounts::require(tx, removed.account_id)?;
            let balance = account.apply_delta(-removed.amount)?;
            accounts::store_balance(tx, account.id(), balance)?;
            Ok(removed)
        })?;
        info!(
            "Deleted transaction {} ({} from acct {})",
            removed.id, removed.amount, removed.account_id
        );
        Ok(())
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.store.read(transactions::list_all)
    }

    pub fn list_transactions_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        self.store.read(|conn| {
            accounts::require(conn, account_id)?;
            transactions::list_by_account(conn, account_id)
        })
    }

    // ---- brokerage holdings ----

    pub fn set_holding(
        &self,
        account_id: Uuid,
        ticker: &str,
        quantity: Decimal,
    ) -> Result<AssetHolding> {
        let holding = self
            .store
            .write(|tx| holdings::upsert(tx, account_id, ticker, quantity))?;
        info!(
            "Set holding {} x {} in acct {}",
            holding.ticker, holding.quantity, account_id
        );
        Ok(holding)
    }

    /// Drop a position. Returns it as it was stored, with the normalized
    /// ticker.
    pub fn remove_holding(&self, account_id: Uuid, ticker: &str) -> Result<AssetHolding> {
        let removed = self
            .store
            .write(|tx| holdings::remove(tx, account_id, ticker))?;
        info!(
            "Removed holding {} x {} from acct {}",
            removed.ticker, removed.quantity, account_id
        );
        Ok(removed)
    }

    pub fn list_holdings(&self, account_id: Uuid) -> Result<Vec<AssetHolding>> {
        self.store.read(|conn| holdings::list(conn, account_id))
    }

    // ---- read-only reporting ----

    pub fn interest_summary(&self, account_id: Uuid) -> Result<InterestSummary> {
        let account = self.get_account(account_id)?;
        let snapshot = account
            .savings_snapshot()
            .ok_or(LedgerError::UnsupportedAccountType {
                id: account_id,
                kind: account.kind(),
            })?;
        Ok(InterestSummary {
            account_id,
            periodic_payout: interest::periodic_payout(&snapshot)?,
            effective_annual_yield: interest::effective_annual_yield(&snapshot)?,
        })
    }

    /// Cash balances signed by category (ASSET +, DEBT -). Brokerage
    /// accounts hold no cash and contribute nothing.
    pub fn net_worth(&self) -> Result<Decimal> {
        let mut total = Decimal::ZERO;
        for account in self.list_accounts()? {
            let Some(balance) = account.balance() else {
                continue;
            };
            total = total
                .checked_add(balance * account.category().sign())
                .ok_or_else(|| LedgerError::validation("Net worth overflows the decimal range"))?;
        }
        Ok(total)
    }

    pub fn balance_history(&self, account_id: Uuid) -> Result<Vec<BalancePoint>> {
        self.store.read(|conn| {
            let account = accounts::require(conn, account_id)?;
            if !account.is_cash_account() {
                return Err(LedgerError::UnsupportedAccountType {
                    id: account_id,
                    kind: account.kind(),
                });
            }
            let mut running = Decimal::ZERO;
            let mut points = Vec::new();
            for t in transactions::list_by_account_chronological(conn, account_id)? {
                running = running.checked_add(t.amount).ok_or_else(|| {
                    LedgerError::validation(format!(
                        "Running balance of account {} overflows on {}",
                        account_id,
                        t.date.date_naive()
                    ))
                })?;
                points.push(BalancePoint {
                    date: t.date,
                    transaction_id: t.id,
                    amount: t.amount,
                    balance: running,
                });
            }
            Ok(points)
        })
    }

    /// Cash accounts whose stored balance disagrees with their transactions.
    pub fn check_balances(&self) -> Result<Vec<BalanceDrift>> {
        let drifts = self.store.read(find_drift)?;
        for d in &drifts {
            warn!(
                "balance drift on '{}' ({}): stored {}, transactions sum {}",
                d.name, d.account_id, d.stored, d.computed
            );
        }
        Ok(drifts)
    }

    /// Rewrite drifted balances from the transaction history. Returns what
    /// was repaired.
    pub fn resync_balances(&self) -> Result<Vec<BalanceDrift>> {
        let repaired = self.store.write(|tx| {
            let drifts = find_drift(tx)?;
            for d in &drifts {
                accounts::store_balance(tx, d.account_id, d.computed)?;
            }
            Ok(drifts)
        })?;
        if !repaired.is_empty() {
            info!("Resynced {} account balances", repaired.len());
        }
        Ok(repaired)
    }
}

// Insert `txn` and move its account's balance by the amount. Caller supplies
// the enclosing unit of work.
fn post(conn: &Connection, txn: &Transaction) -> Result<Account> {
    transactions::record(conn, txn)?;
    let mut account = accounts::require(conn, txn.account_id)?;
    let balance = account.apply_delta(txn.amount)?;
    accounts::store_balance(conn, account.id(), balance)?;
    Ok(account)
}

fn find_drift(conn: &Connection) -> Result<Vec<BalanceDrift>> {
    let mut out = Vec::new();
    for account in accounts::list(conn)? {
        let Some(stored) = account.balance() else {
            continue;
        };
        let computed = transactions::sum_for_account(conn, account.id())?;
        if stored != computed {
            out.push(BalanceDrift {
                account_id: account.id(),
                name: account.name().to_string(),
                stored,
                computed,
            });
        }
    }
    Ok(out)
}
