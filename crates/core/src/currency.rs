//! Currency precision: rounding and zero tests for monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO code (e.g. "EUR").
    pub code: String,
    /// Number of decimal places amounts are rounded to.
    pub digits: u32,
}

impl ValueObject for Currency {}

impl Currency {
    pub fn new(code: impl Into<String>, digits: u32) -> Self {
        Self {
            code: code.into(),
            digits,
        }
    }

    /// Round half-to-even to the currency precision.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.digits, RoundingStrategy::MidpointNearestEven)
    }

    /// `true` when `amount` rounds to zero under this currency.
    pub fn is_zero(&self, amount: Decimal) -> bool {
        self.round(amount).is_zero()
    }
}
