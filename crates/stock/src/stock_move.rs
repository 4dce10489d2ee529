use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockwork_core::{CompanyId, DomainError, DomainResult, Entity, LocationId, MoveId, ProductId, Uom};
use stockwork_products::Product;

/// Message of the `anglo_saxon_quantity <= quantity` constraint.
pub const ANGLO_SAXON_QUANTITY_VIOLATION: &str =
    "Anglo-Saxon quantity can not be greater than quantity!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveState {
    Draft,
    Assigned,
    Done,
    Cancel,
}

/// Where a move comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveOrigin {
    /// Recorded by a stock transaction (shipment, inventory, manual entry).
    Recorded,
    /// Planned by a stock forecast line.
    Forecast,
}

/// A transfer of `quantity` of a product between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    pub product: ProductId,
    pub company: CompanyId,
    pub from_location: LocationId,
    pub to_location: LocationId,
    pub uom: Uom,
    pub quantity: f64,
    /// Transaction price per `uom`.
    pub unit_price: Option<Decimal>,
    /// Running product cost per default unit when the move happened.
    pub cost_price: Option<Decimal>,
    pub planned_date: Option<NaiveDate>,
    pub state: MoveState,
    pub origin: MoveOrigin,
    /// Quantity (in `uom`) already consumed by anglo-saxon costing.
    pub anglo_saxon_quantity: f64,
}

impl Move {
    pub fn new(
        product: ProductId,
        company: CompanyId,
        from_location: LocationId,
        to_location: LocationId,
        uom: Uom,
        quantity: f64,
    ) -> Self {
        Self {
            id: MoveId::new(),
            product,
            company,
            from_location,
            to_location,
            uom,
            quantity,
            unit_price: None,
            cost_price: None,
            planned_date: None,
            state: MoveState::Draft,
            origin: MoveOrigin::Recorded,
            anglo_saxon_quantity: Self::default_anglo_saxon_quantity(),
        }
    }

    pub fn default_anglo_saxon_quantity() -> f64 {
        0.0
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn with_cost_price(mut self, cost_price: Decimal) -> Self {
        self.cost_price = Some(cost_price);
        self
    }

    pub fn with_planned_date(mut self, date: NaiveDate) -> Self {
        self.planned_date = Some(date);
        self
    }

    pub fn with_state(mut self, state: MoveState) -> Self {
        self.state = state;
        self
    }

    pub fn with_origin(mut self, origin: MoveOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_anglo_saxon_quantity(mut self, quantity: f64) -> Self {
        self.anglo_saxon_quantity = quantity;
        self
    }

    /// Quantity (in `uom`) not yet consumed.
    pub fn unconsumed_quantity(&self) -> f64 {
        self.quantity - self.anglo_saxon_quantity
    }

    /// Copy of this move as a new draft record. The consumed counter starts
    /// over; use [`Move::with_anglo_saxon_quantity`] on the copy to override.
    pub fn duplicate(&self) -> Self {
        Self {
            id: MoveId::new(),
            state: MoveState::Draft,
            anglo_saxon_quantity: Self::default_anglo_saxon_quantity(),
            ..self.clone()
        }
    }

    /// `0 <= anglo_saxon_quantity <= quantity`.
    pub fn check_anglo_saxon_quantity(&self) -> DomainResult<()> {
        if self.anglo_saxon_quantity < 0.0 || self.anglo_saxon_quantity > self.quantity {
            return Err(DomainError::invariant(ANGLO_SAXON_QUANTITY_VIOLATION));
        }
        Ok(())
    }

    /// Display name, e.g. `2u Bolt`.
    pub fn rec_name(&self, product: &Product) -> String {
        format!("{}{} {}", self.quantity, self.uom.symbol, product.name())
    }
}

impl Entity for Move {
    type Id = MoveId;

    fn id(&self) -> MoveId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockwork_products::CostPriceMethod;

    fn test_move(quantity: f64) -> Move {
        Move::new(
            ProductId::new(),
            CompanyId::new(),
            LocationId::new(),
            LocationId::new(),
            Uom::unit(),
            quantity,
        )
    }

    #[test]
    fn new_move_has_nothing_consumed() {
        let mv = test_move(5.0);
        assert_eq!(mv.anglo_saxon_quantity, 0.0);
        assert_eq!(mv.unconsumed_quantity(), 5.0);
        assert!(mv.check_anglo_saxon_quantity().is_ok());
    }

    #[test]
    fn duplicate_resets_consumed_quantity() {
        let mv = test_move(5.0)
            .with_unit_price(dec!(3))
            .with_state(MoveState::Done)
            .with_anglo_saxon_quantity(4.0);

        let copy = mv.duplicate();
        assert_ne!(copy.id, mv.id);
        assert_eq!(copy.anglo_saxon_quantity, 0.0);
        assert_eq!(copy.state, MoveState::Draft);
        assert_eq!(copy.unit_price, Some(dec!(3)));
        assert_eq!(copy.quantity, 5.0);
    }

    #[test]
    fn duplicate_can_override_consumed_quantity() {
        let copy = test_move(5.0).duplicate().with_anglo_saxon_quantity(2.0);
        assert_eq!(copy.anglo_saxon_quantity, 2.0);
    }

    #[test]
    fn over_consumption_violates_constraint() {
        let mv = test_move(5.0).with_anglo_saxon_quantity(5.5);
        match mv.check_anglo_saxon_quantity() {
            Err(DomainError::InvariantViolation(msg)) => {
                assert_eq!(msg, ANGLO_SAXON_QUANTITY_VIOLATION)
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
        assert!(test_move(5.0).with_anglo_saxon_quantity(-1.0).check_anglo_saxon_quantity().is_err());
    }

    #[test]
    fn rec_name_shows_quantity_unit_and_product() {
        let product = Product::new(ProductId::new(), "Bolt", Uom::unit(), CostPriceMethod::Fixed).unwrap();
        assert_eq!(test_move(2.0).rec_name(&product), "2u Bolt");
    }
}
