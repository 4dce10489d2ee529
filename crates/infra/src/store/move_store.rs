use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use stockwork_core::{DomainError, DomainResult, MoveId};
use stockwork_stock::{Move, MoveRepository};

use crate::store::error::StoreError;

#[derive(Debug, Default)]
struct MoveTable {
    moves: HashMap<MoveId, Move>,
    /// Creation order.
    order: Vec<MoveId>,
    /// Staged `anglo_saxon_quantity` writes, visible to reads until
    /// committed or rolled back.
    pending: HashMap<MoveId, f64>,
}

impl MoveTable {
    fn read(&self, id: MoveId) -> Option<Move> {
        let mut mv = self.moves.get(&id)?.clone();
        if let Some(&quantity) = self.pending.get(&id) {
            mv.anglo_saxon_quantity = quantity;
        }
        Some(mv)
    }
}

/// In-memory move store for tests/dev.
///
/// Anglo-saxon writes are staged: the `anglo_saxon_quantity <= quantity`
/// constraint is checked by [`InMemoryMoveStore::commit`], which applies all
/// staged writes or none of them.
#[derive(Debug, Default)]
pub struct InMemoryMoveStore {
    inner: RwLock<MoveTable>,
}

impl InMemoryMoveStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<RwLockReadGuard<'_, MoveTable>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned { store: "move store" })
    }

    fn table_mut(&self) -> Result<RwLockWriteGuard<'_, MoveTable>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned { store: "move store" })
    }

    /// Number of staged writes not yet committed.
    pub fn pending_writes(&self) -> usize {
        self.table().map(|t| t.pending.len()).unwrap_or(0)
    }

    /// Apply staged writes. If any staged value breaks the move constraint
    /// every staged write is discarded and the violation is returned.
    pub fn commit(&self) -> Result<(), StoreError> {
        let mut table = self.table_mut()?;
        let pending = std::mem::take(&mut table.pending);

        for (&id, &quantity) in &pending {
            let Some(mv) = table.moves.get(&id) else {
                continue;
            };
            let mut staged = mv.clone();
            staged.anglo_saxon_quantity = quantity;
            if let Err(err) = staged.check_anglo_saxon_quantity() {
                warn!(move_id = %id, quantity, "rolling back anglo-saxon writes");
                let message = match err {
                    DomainError::InvariantViolation(message) => message,
                    other => other.to_string(),
                };
                return Err(StoreError::Constraint { move_id: id, message });
            }
        }

        let count = pending.len();
        for (id, quantity) in pending {
            if let Some(mv) = table.moves.get_mut(&id) {
                mv.anglo_saxon_quantity = quantity;
            }
        }
        debug!(writes = count, "committed anglo-saxon writes");
        Ok(())
    }

    /// Discard staged writes.
    pub fn rollback(&self) -> Result<(), StoreError> {
        self.table_mut()?.pending.clear();
        Ok(())
    }
}

impl MoveRepository for InMemoryMoveStore {
    fn get(&self, id: MoveId) -> DomainResult<Move> {
        self.table()?
            .read(id)
            .ok_or_else(|| DomainError::not_found(format!("move {id}")))
    }

    fn search(&self, filter: &dyn Fn(&Move) -> bool) -> Vec<Move> {
        let table = match self.table() {
            Ok(t) => t,
            Err(_) => return vec![],
        };

        let mut found: Vec<Move> = table
            .order
            .iter()
            .filter_map(|id| table.read(*id))
            .filter(|mv| filter(mv))
            .collect();
        // Stable: equal dates keep creation order, undated moves go last.
        found.sort_by_key(|mv| (mv.planned_date.is_none(), mv.planned_date));
        found
    }

    fn create(&self, mv: Move) -> DomainResult<MoveId> {
        let mut table = self.table_mut()?;
        if table.moves.contains_key(&mv.id) {
            return Err(DomainError::conflict(format!("move {} already exists", mv.id)));
        }
        let id = mv.id;
        table.order.push(id);
        table.moves.insert(id, mv);
        Ok(id)
    }

    fn delete(&self, ids: &[MoveId]) -> DomainResult<()> {
        let mut table = self.table_mut()?;
        if let Some(missing) = ids.iter().find(|id| !table.moves.contains_key(*id)) {
            return Err(DomainError::not_found(format!("move {missing}")));
        }
        for id in ids {
            table.moves.remove(id);
            table.pending.remove(id);
        }
        table.order.retain(|id| !ids.contains(id));
        Ok(())
    }

    fn write_anglo_saxon_quantity(&self, id: MoveId, quantity: f64) -> DomainResult<()> {
        let mut table = self.table_mut()?;
        if !table.moves.contains_key(&id) {
            return Err(DomainError::not_found(format!("move {id}")));
        }
        table.pending.insert(id, quantity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use stockwork_core::{CompanyId, LocationId, ProductId, Uom};
    use stockwork_stock::ANGLO_SAXON_QUANTITY_VIOLATION;

    use super::*;

    fn bolt(qty: f64) -> Move {
        Move::new(
            ProductId::new(),
            CompanyId::new(),
            LocationId::new(),
            LocationId::new(),
            Uom::unit(),
            qty,
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn search_orders_by_planned_date_then_creation() {
        let store = InMemoryMoveStore::new();
        let late = store.create(bolt(1.0).with_planned_date(day(9))).unwrap();
        let undated = store.create(bolt(1.0)).unwrap();
        let early_a = store.create(bolt(1.0).with_planned_date(day(2))).unwrap();
        let early_b = store.create(bolt(1.0).with_planned_date(day(2))).unwrap();

        let ids: Vec<MoveId> = store.search(&|_| true).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![early_a, early_b, late, undated]);
    }

    #[test]
    fn staged_writes_are_visible_before_commit() {
        let store = InMemoryMoveStore::new();
        let id = store.create(bolt(5.0)).unwrap();

        store.write_anglo_saxon_quantity(id, 3.0).unwrap();
        assert_eq!(store.get(id).unwrap().anglo_saxon_quantity, 3.0);
        assert_eq!(store.pending_writes(), 1);

        store.commit().unwrap();
        assert_eq!(store.pending_writes(), 0);
        assert_eq!(store.get(id).unwrap().anglo_saxon_quantity, 3.0);
    }

    #[test]
    fn commit_rejects_overconsumption_and_discards_everything() {
        let store = InMemoryMoveStore::new();
        let ok = store.create(bolt(5.0)).unwrap();
        let bad = store.create(bolt(2.0)).unwrap();

        store.write_anglo_saxon_quantity(ok, 5.0).unwrap();
        store.write_anglo_saxon_quantity(bad, 2.5).unwrap();

        let err = store.commit().unwrap_err();
        assert!(matches!(err, StoreError::Constraint { move_id, .. } if move_id == bad));
        assert_eq!(
            DomainError::from(err),
            DomainError::invariant(ANGLO_SAXON_QUANTITY_VIOLATION)
        );
        assert_eq!(store.get(ok).unwrap().anglo_saxon_quantity, 0.0);
        assert_eq!(store.get(bad).unwrap().anglo_saxon_quantity, 0.0);
    }

    #[test]
    fn rollback_discards_staged_writes() {
        let store = InMemoryMoveStore::new();
        let id = store.create(bolt(5.0)).unwrap();
        store.write_anglo_saxon_quantity(id, 1.0).unwrap();
        store.rollback().unwrap();
        assert_eq!(store.get(id).unwrap().anglo_saxon_quantity, 0.0);
    }

    #[test]
    fn unknown_moves_are_not_found() {
        let store = InMemoryMoveStore::new();
        let missing = MoveId::new();
        assert!(matches!(store.get(missing), Err(DomainError::NotFound(_))));
        assert!(matches!(store.delete(&[missing]), Err(DomainError::NotFound(_))));
        assert!(matches!(
            store.write_anglo_saxon_quantity(missing, 1.0),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn delete_drops_moves_and_their_staged_writes() {
        let store = InMemoryMoveStore::new();
        let keep = store.create(bolt(1.0)).unwrap();
        let gone = store.create(bolt(1.0)).unwrap();
        store.write_anglo_saxon_quantity(gone, 1.0).unwrap();

        store.delete(&[gone]).unwrap();
        assert_eq!(store.pending_writes(), 0);
        let ids: Vec<MoveId> = store.search(&|_| true).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![keep]);
    }
}
