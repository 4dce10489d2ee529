use serde::{Deserialize, Serialize};

use stockwork_core::{CompanyId, Context, DomainError, DomainResult, Entity, WorkId};

/// A node of the work hierarchy.
///
/// Hours are never stored on the node; see [`crate::WorkTree::hours`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: WorkId,
    pub name: String,
    pub parent: Option<WorkId>,
    pub active: bool,
    pub company: CompanyId,
    /// Whether timesheet lines may be entered against this work.
    pub timesheet_available: bool,
}

impl Work {
    pub fn new(name: impl Into<String>, company: CompanyId) -> Self {
        Self {
            id: WorkId::new(),
            name: name.into(),
            parent: None,
            active: true,
            company,
            timesheet_available: true,
        }
    }

    /// A new work owned by the company of `ctx`.
    pub fn for_context(name: impl Into<String>, ctx: &Context) -> DomainResult<Self> {
        let company = ctx
            .company
            .ok_or_else(|| DomainError::validation("no company in context for new work"))?;
        Ok(Self::new(name, company))
    }

    pub fn with_parent(mut self, parent: WorkId) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Entity for Work {
    type Id = WorkId;

    fn id(&self) -> WorkId {
        self.id
    }
}
