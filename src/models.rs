// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{LedgerError, Result};

pub const DEFAULT_COMPOUNDING_PERIODS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Brokerage,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Brokerage => "brokerage",
        }
    }

    pub fn is_cash(self) -> bool {
        matches!(self, AccountKind::Checking | AccountKind::Savings)
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "brokerage" => Ok(AccountKind::Brokerage),
            other => Err(LedgerError::validation(format!(
                "Account type '{}' is not one of checking, savings, brokerage",
                other
            ))),
        }
    }
}

/// Sign convention used when aggregating net worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountCategory {
    #[default]
    Asset,
    Debt,
}

impl AccountCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountCategory::Asset => "ASSET",
            AccountCategory::Debt => "DEBT",
        }
    }

    pub fn sign(self) -> Decimal {
        match self {
            AccountCategory::Asset => Decimal::ONE,
            AccountCategory::Debt => Decimal::NEGATIVE_ONE,
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSET" => Ok(AccountCategory::Asset),
            "DEBT" => Ok(AccountCategory::Debt),
            other => Err(LedgerError::validation(format!(
                "Account category '{}' is not one of ASSET, DEBT",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AccountDetails {
    Checking {
        balance: Decimal,
    },
    Savings {
        balance: Decimal,
        interest_rate: Decimal,
        compounding_periods_per_year: u32,
    },
    Brokerage,
}

impl AccountDetails {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountDetails::Checking { .. } => AccountKind::Checking,
            AccountDetails::Savings { .. } => AccountKind::Savings,
            AccountDetails::Brokerage => AccountKind::Brokerage,
        }
    }
}

// Fields stay private: id and variant are fixed at construction, and only
// the ledger service moves the balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    id: Uuid,
    name: String,
    category: AccountCategory,
    #[serde(flatten)]
    details: AccountDetails,
}

impl Account {
    pub(crate) fn new(
        id: Uuid,
        name: String,
        category: AccountCategory,
        details: AccountDetails,
    ) -> Self {
        Account {
            id,
            name,
            category,
            details,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccountKind {
        self.details.kind()
    }

    pub fn category(&self) -> AccountCategory {
        self.category
    }

    pub fn details(&self) -> &AccountDetails {
        &self.details
    }

    pub fn is_cash_account(&self) -> bool {
        self.kind().is_cash()
    }

    /// `None` for brokerage accounts, which carry no cash balance.
    pub fn balance(&self) -> Option<Decimal> {
        match &self.details {
            AccountDetails::Checking { balance } | AccountDetails::Savings { balance, .. } => {
                Some(*balance)
            }
            AccountDetails::Brokerage => None,
        }
    }

    pub fn savings_snapshot(&self) -> Option<SavingsSnapshot> {
        match &self.details {
            AccountDetails::Savings {
                balance,
                interest_rate,
                compounding_periods_per_year,
            } => Some(SavingsSnapshot {
                balance: *balance,
                interest_rate: *interest_rate,
                compounding_periods_per_year: *compounding_periods_per_year,
            }),
            _ => None,
        }
    }

    pub(crate) fn set_balance(&mut self, value: Decimal) -> Result<()> {
        match &mut self.details {
            AccountDetails::Checking { balance } | AccountDetails::Savings { balance, .. } => {
                *balance = value;
                Ok(())
            }
            AccountDetails::Brokerage => Err(LedgerError::UnsupportedAccountType {
                id: self.id,
                kind: AccountKind::Brokerage,
            }),
        }
    }

    pub(crate) fn apply_delta(&mut self, delta: Decimal) -> Result<Decimal> {
        let current = self.balance().ok_or(LedgerError::UnsupportedAccountType {
            id: self.id,
            kind: self.kind(),
        })?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| LedgerError::validation("Amount would overflow the account balance"))?;
        self.set_balance(next)?;
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsSnapshot {
    pub balance: Decimal,
    pub interest_rate: Decimal,
    pub compounding_periods_per_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub source: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub account_id: Uuid,
    pub ticker: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub category: AccountCategory,
    #[serde(default)]
    pub initial_balance: Decimal,
    pub interest_rate: Option<Decimal>,
    pub compounding_periods_per_year: Option<u32>,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        NewAccount {
            name: name.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub source: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedAccount {
    pub deleted_account: AccountRef,
    pub deleted_transactions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterestSummary {
    pub account_id: Uuid,
    pub periodic_payout: f32,
    pub effective_annual_yield: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: DateTime<Utc>,
    pub transaction_id: Uuid,
    pub amount: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceDrift {
    pub account_id: Uuid,
    pub name: String,
    pub stored: Decimal,
    pub computed: Decimal,
}
