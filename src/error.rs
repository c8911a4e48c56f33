// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::interest::InterestError;
use crate::models::AccountKind;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    #[error("Holding '{ticker}' not found in account {account_id}")]
    HoldingNotFound { account_id: Uuid, ticker: String },

    #[error("Account {id} is a {kind} account and does not support this operation")]
    UnsupportedAccountType { id: Uuid, kind: AccountKind },

    #[error(transparent)]
    Interest(#[from] InterestError),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// A persisted row could not be decoded back into a model.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Caller-facing category of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    UnsupportedAccountType,
    Store,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_failed",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedAccountType => "unsupported_account_type",
            ErrorKind::Store => "store_error",
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Validation => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::UnsupportedAccountType => 4,
            ErrorKind::Store => 5,
        }
    }
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_) | LedgerError::Interest(_) => ErrorKind::Validation,
            LedgerError::AccountNotFound(_)
            | LedgerError::TransactionNotFound(_)
            | LedgerError::HoldingNotFound { .. } => ErrorKind::NotFound,
            LedgerError::UnsupportedAccountType { .. } => ErrorKind::UnsupportedAccountType,
            LedgerError::Store(_) | LedgerError::Corrupt(_) => ErrorKind::Store,
        }
    }

    /// Message safe to show to a caller. Store failures collapse to a
    /// generic line; the detail goes to the log instead.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Store => "Internal storage error".to_string(),
            _ => self.to_string(),
        }
    }
}
