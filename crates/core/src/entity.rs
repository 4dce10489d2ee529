//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Moves, products, work nodes and forecasts are entities: two records with
/// the same identifier are the same record even when their fields differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
