//! Units of measure and quantity/price conversion between them.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A unit of measure.
///
/// `factor` is the number of category reference units contained in one of
/// this unit (a dozen has factor 12 in the "Units" category). `rounding` is
/// the smallest displayable step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uom {
    pub name: String,
    pub symbol: String,
    pub category: String,
    pub factor: f64,
    pub rounding: f64,
}

impl ValueObject for Uom {}

impl Uom {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        category: impl Into<String>,
        factor: f64,
        rounding: f64,
    ) -> DomainResult<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(DomainError::validation("uom factor must be positive"));
        }
        if !(rounding.is_finite() && rounding > 0.0) {
            return Err(DomainError::validation("uom rounding must be positive"));
        }
        Ok(Self {
            name: name.into(),
            symbol: symbol.into(),
            category: category.into(),
            factor,
            rounding,
        })
    }

    /// The reference counting unit.
    pub fn unit() -> Self {
        Self {
            name: "Unit".to_string(),
            symbol: "u".to_string(),
            category: "Units".to_string(),
            factor: 1.0,
            rounding: 1.0,
        }
    }

    /// Round a quantity to this unit's display precision.
    pub fn round(&self, quantity: f64) -> f64 {
        (quantity / self.rounding).round() * self.rounding
    }

    fn ensure_same_category(from: &Uom, to: &Uom) -> DomainResult<()> {
        if from.category != to.category {
            return Err(DomainError::validation(format!(
                "incompatible units: {} ({}) and {} ({})",
                from.name, from.category, to.name, to.category
            )));
        }
        Ok(())
    }

    /// Convert `quantity` expressed in `from` into `to`.
    ///
    /// With `round = false` the exact converted value is returned, which is
    /// what allocation boundaries rely on.
    pub fn compute_qty(from: &Uom, quantity: f64, to: &Uom, round: bool) -> DomainResult<f64> {
        let amount = if from == to {
            quantity
        } else {
            Self::ensure_same_category(from, to)?;
            quantity * from.factor / to.factor
        };
        Ok(if round { to.round(amount) } else { amount })
    }

    /// Convert a price per `from` unit into a price per `to` unit.
    pub fn compute_price(from: &Uom, price: Decimal, to: &Uom) -> DomainResult<Decimal> {
        if from == to {
            return Ok(price);
        }
        Self::ensure_same_category(from, to)?;
        let from_factor = factor_to_decimal(from)?;
        let to_factor = factor_to_decimal(to)?;
        Ok(price / from_factor * to_factor)
    }
}

fn factor_to_decimal(uom: &Uom) -> DomainResult<Decimal> {
    Decimal::try_from(uom.factor)
        .map_err(|e| DomainError::validation(format!("uom {} factor: {e}", uom.name)))
}

/// Lift a floating quantity into a decimal through its shortest textual
/// representation, so `0.1` becomes exactly `0.1`.
pub fn quantity_to_decimal(quantity: f64) -> DomainResult<Decimal> {
    Decimal::from_str(&quantity.to_string())
        .or_else(|_| Decimal::try_from(quantity))
        .map_err(|e| DomainError::validation(format!("quantity {quantity}: {e}")))
}
