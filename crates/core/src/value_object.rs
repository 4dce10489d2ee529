//! Value object trait: equality by value, not identity.
//!
//! Units of measure and currencies are value objects: a `Uom` is defined
//! entirely by its category, factor and rounding, so two units with the same
//! attributes convert quantities identically.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Currency { code: String, digits: u32 }
///
/// impl ValueObject for Currency {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
