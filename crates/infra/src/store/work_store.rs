use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockwork_core::{Context, DomainError, DomainResult, WorkId};
use stockwork_timesheet::{HourLedger, Work, WorkError, WorkRepository, WorkTree};

use crate::store::error::StoreError;

/// Shared work hierarchy for tests/dev.
///
/// Writes go through [`WorkTree`], so the recursion and parent company
/// constraints hold after every successful call.
#[derive(Debug, Default)]
pub struct InMemoryWorkStore {
    tree: RwLock<WorkTree>,
}

impl InMemoryWorkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_works(works: impl IntoIterator<Item = Work>) -> Result<Self, WorkError> {
        Ok(Self {
            tree: RwLock::new(WorkTree::from_works(works)?),
        })
    }

    fn tree(&self) -> Result<RwLockReadGuard<'_, WorkTree>, StoreError> {
        self.tree.read().map_err(|_| StoreError::Poisoned { store: "work store" })
    }

    fn tree_mut(&self) -> Result<RwLockWriteGuard<'_, WorkTree>, StoreError> {
        self.tree.write().map_err(|_| StoreError::Poisoned { store: "work store" })
    }

    pub fn create(&self, work: Work) -> Result<WorkId, WorkError> {
        let mut tree = self.tree_mut().map_err(|e| WorkError::Domain(e.into()))?;
        tree.create(work)
    }

    pub fn write_parent(&self, id: WorkId, parent: Option<WorkId>) -> Result<(), WorkError> {
        let mut tree = self.tree_mut().map_err(|e| WorkError::Domain(e.into()))?;
        tree.write_parent(id, parent)
    }

    pub fn qualified_name(&self, id: WorkId) -> DomainResult<String> {
        self.tree()?.qualified_name(id)
    }

    pub fn hours<L>(&self, ids: &[WorkId], ledger: &L, ctx: &Context) -> DomainResult<HashMap<WorkId, f64>>
    where
        L: HourLedger + ?Sized,
    {
        self.tree()?.hours(ids, ledger, ctx)
    }
}

impl WorkRepository for InMemoryWorkStore {
    fn get(&self, id: WorkId) -> DomainResult<Work> {
        self.tree()?
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("work {id}")))
    }

    fn children(&self, id: WorkId) -> DomainResult<Vec<WorkId>> {
        self.tree()?.children(id)
    }

    fn descendants(&self, ids: &[WorkId]) -> DomainResult<Vec<WorkId>> {
        self.tree()?.child_of(ids)
    }

    fn write_active(&self, ids: &[WorkId], active: bool) -> DomainResult<Vec<WorkId>> {
        self.tree_mut()?.set_active(ids, active)
    }
}

#[cfg(test)]
mod tests {
    use stockwork_core::CompanyId;
    use stockwork_timesheet::WorkViolation;

    use super::*;

    #[test]
    fn reactivation_does_not_cascade() {
        let company = CompanyId::new();
        let store = InMemoryWorkStore::new();
        let root = store.create(Work::new("Root", company)).unwrap();
        let child = store.create(Work::new("Child", company).with_parent(root)).unwrap();

        assert_eq!(store.write_active(&[root], false).unwrap().len(), 2);
        assert_eq!(store.write_active(&[root], true).unwrap(), vec![root]);
        assert!(store.get(root).unwrap().active);
        assert!(!store.get(child).unwrap().active);
        assert_eq!(store.descendants(&[root]).unwrap(), vec![root, child]);
        assert_eq!(store.children(root).unwrap(), vec![child]);
    }

    #[test]
    fn rejects_parent_from_another_company() {
        let store = InMemoryWorkStore::new();
        let root = store.create(Work::new("Root", CompanyId::new())).unwrap();
        let err = store
            .create(Work::new("Child", CompanyId::new()).with_parent(root))
            .unwrap_err();
        assert!(matches!(
            err,
            WorkError::Violation { violation: WorkViolation::ParentCompany, .. }
        ));
        assert!(matches!(store.get(WorkId::new()), Err(DomainError::NotFound(_))));
    }
}
