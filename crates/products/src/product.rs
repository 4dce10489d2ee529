use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockwork_accounting::Account;
use stockwork_core::{DomainError, DomainResult, Entity, ProductId, Uom};

/// How the standing cost price of a product evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostPriceMethod {
    /// Cost price is a standard set by hand; purchase price differences are
    /// booked as variances.
    Fixed,
    /// Cost price follows the weighted average of receptions.
    Average,
}

/// A stockable product, as seen by valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    default_uom: Uom,
    /// Standing cost, per `default_uom`.
    cost_price: Decimal,
    /// Sale price, per `default_uom`.
    list_price: Decimal,
    cost_price_method: CostPriceMethod,
    account_stock_supplier: Option<Account>,
    account_expense: Option<Account>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        default_uom: Uom,
        cost_price_method: CostPriceMethod,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            default_uom,
            cost_price: Decimal::ZERO,
            list_price: Decimal::ZERO,
            cost_price_method,
            account_stock_supplier: None,
            account_expense: None,
        })
    }

    pub fn with_cost_price(mut self, cost_price: Decimal) -> Self {
        self.cost_price = cost_price;
        self
    }

    pub fn with_list_price(mut self, list_price: Decimal) -> Self {
        self.list_price = list_price;
        self
    }

    pub fn with_accounts(mut self, stock_supplier: Account, expense: Account) -> Self {
        self.account_stock_supplier = Some(stock_supplier);
        self.account_expense = Some(expense);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_uom(&self) -> &Uom {
        &self.default_uom
    }

    pub fn cost_price(&self) -> Decimal {
        self.cost_price
    }

    pub fn list_price(&self) -> Decimal {
        self.list_price
    }

    pub fn cost_price_method(&self) -> CostPriceMethod {
        self.cost_price_method
    }

    pub fn is_fixed_cost(&self) -> bool {
        self.cost_price_method == CostPriceMethod::Fixed
    }

    /// Account receiving stock valued at supplier price.
    pub fn account_stock_supplier_used(&self) -> Option<&Account> {
        self.account_stock_supplier.as_ref()
    }

    /// Account receiving cost variances.
    pub fn account_expense_used(&self) -> Option<&Account> {
        self.account_expense.as_ref()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stockwork_accounting::AccountKind;

    #[test]
    fn new_product_starts_at_zero_cost() {
        let product = Product::new(ProductId::new(), "Bolt", Uom::unit(), CostPriceMethod::Fixed).unwrap();
        assert_eq!(product.cost_price(), Decimal::ZERO);
        assert!(product.is_fixed_cost());
        assert!(product.account_stock_supplier_used().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Product::new(ProductId::new(), "  ", Uom::unit(), CostPriceMethod::Average).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn builder_sets_prices_and_accounts() {
        let supplier = Account::new("1310", "Stock Supplier", AccountKind::Liability);
        let expense = Account::new("6000", "Expense", AccountKind::Expense);
        let product = Product::new(ProductId::new(), "Bolt", Uom::unit(), CostPriceMethod::Average)
            .unwrap()
            .with_cost_price(dec!(4.5))
            .with_list_price(dec!(9))
            .with_accounts(supplier.clone(), expense.clone());

        assert_eq!(product.cost_price(), dec!(4.5));
        assert_eq!(product.list_price(), dec!(9));
        assert!(!product.is_fixed_cost());
        assert_eq!(product.account_stock_supplier_used(), Some(&supplier));
        assert_eq!(product.account_expense_used(), Some(&expense));
    }
}
