// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub(crate) mod accounts;
pub(crate) mod holdings;
pub(crate) mod transactions;

mod service;

pub use service::{Ledger, OPENING_BALANCE_SOURCE};
