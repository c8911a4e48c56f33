// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interest payout and yield for savings accounts.
//!
//! Arithmetic is single precision. Balances and rates are exact decimals in
//! storage and are narrowed to `f32` on the way in.

use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use crate::models::SavingsSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterestError {
    #[error("Compounding periods per year must be positive, got {0}")]
    InvalidCompounding(u32),
    #[error("Value {0} cannot be represented as a 32-bit float")]
    OutOfRange(String),
}

fn periods(acct: &SavingsSnapshot) -> Result<f32, InterestError> {
    match acct.compounding_periods_per_year {
        0 => Err(InterestError::InvalidCompounding(0)),
        n => Ok(n as f32),
    }
}

fn narrow(value: rust_decimal::Decimal) -> Result<f32, InterestError> {
    value
        .to_f32()
        .ok_or_else(|| InterestError::OutOfRange(value.to_string()))
}

/// Interest credited each compounding period at the current balance.
pub fn periodic_payout(acct: &SavingsSnapshot) -> Result<f32, InterestError> {
    let n = periods(acct)?;
    let pct = narrow(acct.interest_rate)? / 100.0 / n;
    Ok(narrow(acct.balance)? * pct)
}

/// Growth factor over a year. The exponent is `n - 1`, kept as-is from the
/// original formula rather than the textbook `n`.
pub fn effective_annual_yield(acct: &SavingsSnapshot) -> Result<f32, InterestError> {
    let n = periods(acct)?;
    let rate = narrow(acct.interest_rate)?;
    Ok((1.0 + rate / 100.0 / n).powf(n - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn snapshot(balance: i64, rate: i64, n: u32) -> SavingsSnapshot {
        SavingsSnapshot {
            balance: Decimal::from(balance),
            interest_rate: Decimal::from(rate),
            compounding_periods_per_year: n,
        }
    }

    #[test]
    fn monthly_payout() {
        let p = periodic_payout(&snapshot(1200, 6, 12)).unwrap();
        assert!((p - 6.0).abs() < 1e-4, "payout was {p}");
    }

    #[test]
    fn yield_uses_n_minus_one_exponent() {
        let y = effective_annual_yield(&snapshot(0, 12, 12)).unwrap();
        assert!((y - 1.1157).abs() < 1e-4, "yield was {y}");
        // textbook (1.01)^12 would be ~1.1268
        assert!((y - 1.1268).abs() > 1e-3);
    }

    #[test]
    fn zero_rate_pays_nothing() {
        let acct = snapshot(5000, 0, 12);
        assert_eq!(periodic_payout(&acct).unwrap(), 0.0);
        assert_eq!(effective_annual_yield(&acct).unwrap(), 1.0);
    }

    #[test]
    fn annual_compounding_yield_is_one() {
        // exponent n - 1 == 0
        let y = effective_annual_yield(&snapshot(100, 5, 1)).unwrap();
        assert_eq!(y, 1.0);
        let p = periodic_payout(&snapshot(100, 5, 1)).unwrap();
        assert!((p - 5.0).abs() < 1e-5);
    }

    #[test]
    fn zero_compounding_is_rejected() {
        let acct = snapshot(1200, 6, 0);
        assert_eq!(
            periodic_payout(&acct),
            Err(InterestError::InvalidCompounding(0))
        );
        assert_eq!(
            effective_annual_yield(&acct),
            Err(InterestError::InvalidCompounding(0))
        );
    }

    #[test]
    fn negative_balance_gives_negative_payout() {
        let p = periodic_payout(&snapshot(-1200, 6, 12)).unwrap();
        assert!((p + 6.0).abs() < 1e-4);
    }
}
