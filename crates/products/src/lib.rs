//! Products module: the costing view of a product.
//!
//! Holds the fields stock valuation reads (default unit, standing cost price,
//! cost method, stock/expense accounts). No IO, no storage.

pub mod product;

pub use product::{CostPriceMethod, Product};
