//! Persistence seam for stock moves.

use std::sync::Arc;

use stockwork_core::{DomainResult, MoveId};

use crate::stock_move::Move;

/// Storage of stock moves.
///
/// Implementations own transactional behavior: `write_anglo_saxon_quantity`
/// may be staged and the `anglo_saxon_quantity <= quantity` constraint checked
/// when the enclosing transaction commits.
pub trait MoveRepository: Send + Sync {
    fn get(&self, id: MoveId) -> DomainResult<Move>;

    /// Moves matching `filter`, ordered by planned date then creation order.
    fn search(&self, filter: &dyn Fn(&Move) -> bool) -> Vec<Move>;

    fn create(&self, mv: Move) -> DomainResult<MoveId>;

    fn delete(&self, ids: &[MoveId]) -> DomainResult<()>;

    /// Overwrite the consumed counter of a move (value in the move's unit).
    fn write_anglo_saxon_quantity(&self, id: MoveId, quantity: f64) -> DomainResult<()>;
}

impl<S> MoveRepository for Arc<S>
where
    S: MoveRepository + ?Sized,
{
    fn get(&self, id: MoveId) -> DomainResult<Move> {
        (**self).get(id)
    }

    fn search(&self, filter: &dyn Fn(&Move) -> bool) -> Vec<Move> {
        (**self).search(filter)
    }

    fn create(&self, mv: Move) -> DomainResult<MoveId> {
        (**self).create(mv)
    }

    fn delete(&self, ids: &[MoveId]) -> DomainResult<()> {
        (**self).delete(ids)
    }

    fn write_anglo_saxon_quantity(&self, id: MoveId, quantity: f64) -> DomainResult<()> {
        (**self).write_anglo_saxon_quantity(id, quantity)
    }
}
