//! Persistence seam for works.

use std::sync::Arc;

use stockwork_core::{DomainResult, WorkId};

use crate::work::Work;

/// Storage of the work hierarchy.
pub trait WorkRepository: Send + Sync {
    fn get(&self, id: WorkId) -> DomainResult<Work>;

    /// Direct children of `id`.
    fn children(&self, id: WorkId) -> DomainResult<Vec<WorkId>>;

    /// `ids` and all of their descendants, active or not.
    fn descendants(&self, ids: &[WorkId]) -> DomainResult<Vec<WorkId>>;

    /// Write the `active` flag. Deactivation cascades to descendants.
    /// Returns the works whose flag changed.
    fn write_active(&self, ids: &[WorkId], active: bool) -> DomainResult<Vec<WorkId>>;
}

impl<S> WorkRepository for Arc<S>
where
    S: WorkRepository + ?Sized,
{
    fn get(&self, id: WorkId) -> DomainResult<Work> {
        (**self).get(id)
    }

    fn children(&self, id: WorkId) -> DomainResult<Vec<WorkId>> {
        (**self).children(id)
    }

    fn descendants(&self, ids: &[WorkId]) -> DomainResult<Vec<WorkId>> {
        (**self).descendants(ids)
    }

    fn write_active(&self, ids: &[WorkId], active: bool) -> DomainResult<Vec<WorkId>> {
        (**self).write_active(ids, active)
    }
}
