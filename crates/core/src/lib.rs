//! `stockwork-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, units of measure, currency rounding and the
//! explicit per-call [`Context`].

pub mod context;
pub mod currency;
pub mod entity;
pub mod error;
pub mod id;
pub mod uom;
pub mod value_object;

pub use context::Context;
pub use currency::Currency;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CompanyId, ForecastId, LocationId, MoveId, ProductId, WorkId};
pub use uom::Uom;
pub use value_object::ValueObject;
