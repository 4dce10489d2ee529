//! Anglo-saxon cost consumption.
//!
//! Cost of goods is recognized when they leave stock. Each outbound quantity
//! consumes earlier moves in the order the caller supplies them, and every
//! move remembers how much of it was consumed so far
//! (`Move::anglo_saxon_quantity`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use stockwork_core::uom::quantity_to_decimal;
use stockwork_core::{DomainError, DomainResult, Entity, MoveId, Uom};
use stockwork_products::Product;

use crate::move_type::MoveType;
use crate::repository::MoveRepository;
use crate::stock_move::Move;

/// Lazily yields `(move, quantity)` pairs, `quantity` being what to consume
/// on that move, in the product default unit.
///
/// Moves are taken greedily in slice order and at most once each. Moves with
/// nothing left are skipped. Iteration ends as soon as the requested quantity
/// is covered or the moves run out.
#[derive(Debug)]
pub struct ConsumableMoves<'a> {
    moves: core::slice::Iter<'a, Move>,
    default_uom: &'a Uom,
    quantity: f64,
    consumed: f64,
}

pub fn consumable_moves<'a>(moves: &'a [Move], default_uom: &'a Uom, quantity: f64) -> ConsumableMoves<'a> {
    ConsumableMoves {
        moves: moves.iter(),
        default_uom,
        quantity,
        consumed: 0.0,
    }
}

impl<'a> Iterator for ConsumableMoves<'a> {
    type Item = DomainResult<(&'a Move, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.consumed < self.quantity {
            let mv = self.moves.next()?;
            // Unrounded: rounding here would move allocation boundaries.
            let available = match Uom::compute_qty(&mv.uom, mv.unconsumed_quantity(), self.default_uom, false) {
                Ok(q) => q,
                Err(e) => return Some(Err(e)),
            };
            if available <= 0.0 {
                continue;
            }
            let qty = available.min(self.quantity - self.consumed);
            self.consumed += qty;
            return Some(Ok((mv, qty)));
        }
        None
    }
}

/// Quantity taken from one move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub move_id: MoveId,
    /// Consumed quantity, in the product default unit.
    pub quantity: f64,
    /// Price per default unit the quantity was valued at.
    pub unit_cost: Decimal,
    /// New value of the move's `anglo_saxon_quantity` (in the move's unit).
    pub anglo_saxon_quantity: f64,
}

/// Quantity no move could cover, valued at the product's standing cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shortfall {
    pub quantity: f64,
    pub unit_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngloSaxonCost {
    /// Total cost of the requested quantity.
    pub cost: Decimal,
    pub consumptions: Vec<Consumption>,
    pub shortfall: Option<Shortfall>,
}

impl AngloSaxonCost {
    /// Quantity covered by moves, in the product default unit.
    pub fn allocated_quantity(&self) -> f64 {
        self.consumptions.iter().map(|c| c.quantity).sum()
    }
}

fn move_unit_cost(mv: &Move, default_uom: &Uom, move_type: MoveType) -> DomainResult<Decimal> {
    if move_type.is_incoming() {
        let unit_price = mv
            .unit_price
            .ok_or_else(|| DomainError::validation(format!("move {} has no unit price", mv.id)))?;
        Uom::compute_price(&mv.uom, unit_price, default_uom)
    } else {
        mv.cost_price
            .ok_or_else(|| DomainError::validation(format!("move {} has no cost price", mv.id)))
    }
}

/// Cost of `quantity` (expressed in `uom`) of `product`, consumed from
/// `moves` in order.
///
/// Each consumed move gets its `anglo_saxon_quantity` increased through
/// `repo`, only once every consumed move has been priced and converted; a
/// failing move leaves the repository untouched. Calling this twice for the same physical event counts the
/// consumption twice. Whatever the moves cannot cover is valued at the
/// product's current cost price and touches no move.
///
/// # Panics
///
/// When a move belongs to another product.
pub fn update_anglo_saxon_quantity_product_cost<R>(
    repo: &R,
    product: &Product,
    moves: &[Move],
    quantity: f64,
    uom: &Uom,
    move_type: MoveType,
) -> DomainResult<AngloSaxonCost>
where
    R: MoveRepository + ?Sized,
{
    assert!(
        moves.iter().all(|mv| mv.product == product.id()),
        "wrong product"
    );

    let default_uom = product.default_uom();
    let total_qty = Uom::compute_qty(uom, quantity, default_uom, false)?;

    let mut cost = Decimal::ZERO;
    let mut consumed_qty = 0.0;
    let mut consumptions = Vec::new();

    // Price and convert everything before touching the repository.
    for item in consumable_moves(moves, default_uom, total_qty) {
        let (mv, move_qty) = item?;
        consumed_qty += move_qty;

        let unit_cost = move_unit_cost(mv, default_uom, move_type)?;
        cost += unit_cost * quantity_to_decimal(move_qty)?;

        let delta = Uom::compute_qty(default_uom, move_qty, &mv.uom, false)?;
        let anglo_saxon_quantity = if delta >= mv.unconsumed_quantity() {
            mv.quantity
        } else {
            mv.anglo_saxon_quantity + delta
        };
        consumptions.push(Consumption {
            move_id: mv.id,
            quantity: move_qty,
            unit_cost,
            anglo_saxon_quantity,
        });
    }

    let mut shortfall = None;
    if consumed_qty < total_qty {
        let qty = total_qty - consumed_qty;
        let unit_cost = product.cost_price();
        cost += unit_cost * quantity_to_decimal(qty)?;
        warn!(
            product_id = %product.id(),
            quantity = qty,
            %unit_cost,
            "not enough moves to consume, using product cost price"
        );
        shortfall = Some(Shortfall {
            quantity: qty,
            unit_cost,
        });
    }

    for consumption in &consumptions {
        repo.write_anglo_saxon_quantity(consumption.move_id, consumption.anglo_saxon_quantity)?;
        debug!(
            move_id = %consumption.move_id,
            quantity = consumption.quantity,
            unit_cost = %consumption.unit_cost,
            anglo_saxon_quantity = consumption.anglo_saxon_quantity,
            "consumed move"
        );
    }

    Ok(AngloSaxonCost {
        cost,
        consumptions,
        shortfall,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use stockwork_core::{CompanyId, LocationId, ProductId};
    use stockwork_products::CostPriceMethod;

    /// Records writes; nothing else is needed by the allocator.
    #[derive(Default)]
    struct WriteLog {
        writes: RwLock<HashMap<MoveId, f64>>,
    }

    impl WriteLog {
        fn written(&self, id: MoveId) -> Option<f64> {
            self.writes.read().unwrap().get(&id).copied()
        }
    }

    impl MoveRepository for WriteLog {
        fn get(&self, id: MoveId) -> DomainResult<Move> {
            Err(DomainError::not_found(format!("move {id}")))
        }

        fn search(&self, _filter: &dyn Fn(&Move) -> bool) -> Vec<Move> {
            Vec::new()
        }

        fn create(&self, mv: Move) -> DomainResult<MoveId> {
            Ok(mv.id)
        }

        fn delete(&self, _ids: &[MoveId]) -> DomainResult<()> {
            Ok(())
        }

        fn write_anglo_saxon_quantity(&self, id: MoveId, quantity: f64) -> DomainResult<()> {
            self.writes.write().unwrap().insert(id, quantity);
            Ok(())
        }
    }

    fn dozen() -> Uom {
        Uom::new("Dozen", "dz", "Units", 12.0, 1.0).unwrap()
    }

    fn test_product(cost_price: Decimal) -> Product {
        Product::new(ProductId::new(), "Widget", Uom::unit(), CostPriceMethod::Average)
            .unwrap()
            .with_cost_price(cost_price)
    }

    fn incoming(product: &Product, uom: Uom, quantity: f64, unit_price: Decimal) -> Move {
        Move::new(
            product.id(),
            CompanyId::new(),
            LocationId::new(),
            LocationId::new(),
            uom,
            quantity,
        )
        .with_unit_price(unit_price)
        .with_cost_price(product.cost_price())
    }

    #[test]
    fn consumes_moves_in_order() {
        let product = test_product(dec!(1));
        let moves = vec![
            incoming(&product, Uom::unit(), 3.0, dec!(10)),
            incoming(&product, Uom::unit(), 5.0, dec!(20)),
        ];
        let repo = WriteLog::default();

        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            4.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(50));
        assert_eq!(result.consumptions.len(), 2);
        assert_eq!(result.shortfall, None);
        assert_eq!(repo.written(moves[0].id), Some(3.0));
        assert_eq!(repo.written(moves[1].id), Some(1.0));
    }

    #[test]
    fn skips_fully_consumed_moves() {
        let product = test_product(dec!(1));
        let moves = vec![
            incoming(&product, Uom::unit(), 3.0, dec!(10)).with_anglo_saxon_quantity(3.0),
            incoming(&product, Uom::unit(), 5.0, dec!(20)).with_anglo_saxon_quantity(1.0),
        ];
        let repo = WriteLog::default();

        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            2.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(40));
        assert_eq!(repo.written(moves[0].id), None);
        assert_eq!(repo.written(moves[1].id), Some(3.0));
    }

    #[test]
    fn stops_once_quantity_is_covered() {
        let product = test_product(dec!(1));
        let moves = vec![
            incoming(&product, Uom::unit(), 5.0, dec!(10)),
            incoming(&product, Uom::unit(), 5.0, dec!(20)),
        ];
        let repo = WriteLog::default();

        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            5.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(50));
        assert_eq!(result.consumptions.len(), 1);
        assert_eq!(repo.written(moves[1].id), None);
    }

    #[test]
    fn shortfall_is_valued_at_product_cost() {
        let product = test_product(dec!(7));
        let moves = vec![incoming(&product, Uom::unit(), 2.0, dec!(10))];
        let repo = WriteLog::default();

        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            5.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(20) + dec!(21));
        assert_eq!(
            result.shortfall,
            Some(Shortfall {
                quantity: 3.0,
                unit_cost: dec!(7),
            })
        );
        assert_eq!(repo.written(moves[0].id), Some(2.0));
    }

    #[test]
    fn outgoing_uses_recorded_cost_price() {
        let product = test_product(dec!(1));
        let moves = vec![
            incoming(&product, Uom::unit(), 4.0, dec!(10)).with_cost_price(dec!(6)),
        ];
        let repo = WriteLog::default();

        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            2.0,
            &Uom::unit(),
            MoveType::OUT_CUSTOMER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(12));
    }

    #[test]
    fn converts_units_of_moves_and_request() {
        let product = test_product(dec!(1));
        // One dozen at 24 per dozen, i.e. 2 per unit.
        let moves = vec![incoming(&product, dozen(), 1.0, dec!(24))];
        let repo = WriteLog::default();

        // Half a dozen requested.
        let result = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            0.5,
            &dozen(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap();

        assert_eq!(result.cost, dec!(12));
        assert_eq!(result.allocated_quantity(), 6.0);
        assert_eq!(repo.written(moves[0].id), Some(0.5));
    }

    #[test]
    fn missing_unit_price_is_an_error() {
        let product = test_product(dec!(1));
        let mut mv = incoming(&product, Uom::unit(), 1.0, dec!(1));
        mv.unit_price = None;
        let repo = WriteLog::default();

        let err = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &[mv],
            1.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn failed_pricing_writes_nothing() {
        let product = test_product(dec!(1));
        let mut unpriced = incoming(&product, Uom::unit(), 2.0, dec!(1));
        unpriced.unit_price = None;
        let moves = vec![incoming(&product, Uom::unit(), 2.0, dec!(5)), unpriced];
        let repo = WriteLog::default();

        let err = update_anglo_saxon_quantity_product_cost(
            &repo,
            &product,
            &moves,
            3.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(repo.written(moves[0].id), None);
        assert_eq!(repo.written(moves[1].id), None);
    }

    #[test]
    #[should_panic(expected = "wrong product")]
    fn mixed_products_panic() {
        let product = test_product(dec!(1));
        let other = test_product(dec!(1));
        let moves = vec![incoming(&other, Uom::unit(), 1.0, dec!(1))];
        let _ = update_anglo_saxon_quantity_product_cost(
            &WriteLog::default(),
            &product,
            &moves,
            1.0,
            &Uom::unit(),
            MoveType::IN_SUPPLIER,
        );
    }

    #[test]
    fn consumable_moves_yields_nothing_for_zero_quantity() {
        let product = test_product(dec!(1));
        let moves = vec![incoming(&product, Uom::unit(), 1.0, dec!(1))];
        assert_eq!(consumable_moves(&moves, &Uom::unit(), 0.0).count(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: consumed counters stay within `[0, quantity]` and the
        /// allocated quantity plus the shortfall equals the request.
        #[test]
        fn allocation_is_bounded_and_conserves_quantity(
            stock in prop::collection::vec((1u32..50, 0u32..50), 0..8),
            requested in 0u32..200,
        ) {
            let product = test_product(dec!(3));
            let moves: Vec<Move> = stock
                .iter()
                .map(|&(qty, consumed)| {
                    let qty = f64::from(qty);
                    incoming(&product, Uom::unit(), qty, dec!(5))
                        .with_anglo_saxon_quantity(f64::from(consumed).min(qty))
                })
                .collect();
            let repo = WriteLog::default();
            let requested = f64::from(requested);

            let result = update_anglo_saxon_quantity_product_cost(
                &repo,
                &product,
                &moves,
                requested,
                &Uom::unit(),
                MoveType::IN_SUPPLIER,
            )
            .unwrap();

            for mv in &moves {
                let value = repo.written(mv.id).unwrap_or(mv.anglo_saxon_quantity);
                prop_assert!(value >= 0.0);
                prop_assert!(value <= mv.quantity);
            }

            let shortfall = result.shortfall.as_ref().map_or(0.0, |s| s.quantity);
            prop_assert!((result.allocated_quantity() + shortfall - requested).abs() < 1e-9);
        }

        /// Property: with moves in dozens and the request in units, counters
        /// stay bounded and quantity is conserved up to conversion error.
        #[test]
        fn mixed_units_conserve_quantity(
            stock in prop::collection::vec((1u32..10, 0u32..10), 0..6),
            requested in 0u32..150,
        ) {
            let product = test_product(dec!(3));
            let moves: Vec<Move> = stock
                .iter()
                .map(|&(qty, consumed)| {
                    let qty = f64::from(qty);
                    incoming(&product, dozen(), qty, dec!(60))
                        .with_anglo_saxon_quantity((f64::from(consumed) / 4.0).min(qty))
                })
                .collect();
            let repo = WriteLog::default();
            let requested = f64::from(requested);

            let result = update_anglo_saxon_quantity_product_cost(
                &repo,
                &product,
                &moves,
                requested,
                &Uom::unit(),
                MoveType::IN_SUPPLIER,
            )
            .unwrap();

            for mv in &moves {
                let value = repo.written(mv.id).unwrap_or(mv.anglo_saxon_quantity);
                prop_assert!(value >= 0.0);
                prop_assert!(value <= mv.quantity);
            }

            let shortfall = result.shortfall.as_ref().map_or(0.0, |s| s.quantity);
            prop_assert!((result.allocated_quantity() + shortfall - requested).abs() < 1e-6);
        }
    }
}
