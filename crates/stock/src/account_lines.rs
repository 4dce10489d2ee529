//! Cost variance lines for supplier moves of fixed-cost products.

use rust_decimal::Decimal;
use tracing::debug;

use stockwork_accounting::AccountMoveLine;
use stockwork_core::uom::quantity_to_decimal;
use stockwork_core::{Currency, DomainError, DomainResult, Entity, Uom};
use stockwork_products::Product;

use crate::move_type::MoveType;
use crate::stock_move::Move;

/// Adjust the account lines generated for `mv`.
///
/// A fixed-cost product is stocked at its standard cost, so the difference
/// between the purchase price and that cost is moved from the stock supplier
/// account to the expense account. Lines are returned unchanged when the move
/// is not supplier-side, the product is not fixed-cost, the variance rounds
/// to zero, or no line uses the stock supplier account.
pub fn account_stock_move_lines(
    mv: &Move,
    product: &Product,
    currency: &Currency,
    move_type: MoveType,
    mut lines: Vec<AccountMoveLine>,
) -> DomainResult<Vec<AccountMoveLine>> {
    if !move_type.is_supplier() || !product.is_fixed_cost() {
        return Ok(lines);
    }

    let standard = mv.cost_price.unwrap_or_else(|| product.cost_price());
    let cost_price = Uom::compute_price(product.default_uom(), standard, &mv.uom)?;
    let unit_price = mv
        .unit_price
        .ok_or_else(|| DomainError::validation(format!("move {} has no unit price", mv.id)))?;
    let amount = currency.round(quantity_to_decimal(mv.quantity)? * (unit_price - cost_price));
    if currency.is_zero(amount) {
        return Ok(lines);
    }

    let Some(account) = product.account_stock_supplier_used() else {
        return Ok(lines);
    };
    let Some(supplier_line) = lines.iter_mut().find(|line| &line.account == account) else {
        return Ok(lines);
    };

    if move_type.is_incoming() {
        supplier_line.credit += amount;
    } else {
        supplier_line.debit += amount;
    }
    // Expense side: debit on reception, credit on return; a negative
    // variance lands on the opposite side with a positive amount.
    let (debit, credit) = if move_type.is_incoming() == (amount > Decimal::ZERO) {
        (amount.abs(), Decimal::ZERO)
    } else {
        (Decimal::ZERO, amount.abs())
    };

    let expense = product.account_expense_used().ok_or_else(|| {
        DomainError::validation(format!("product {} has no expense account", product.id()))
    })?;
    debug!(move_id = %mv.id, %amount, %move_type, "booking cost variance");
    lines.push(AccountMoveLine {
        name: mv.rec_name(product),
        account: expense.clone(),
        debit,
        credit,
    });
    Ok(lines)
}
