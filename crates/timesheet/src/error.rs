use thiserror::Error;

use stockwork_core::{DomainError, WorkId};

/// Business rule broken by a work record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkViolation {
    #[error("You can not create recursive works!")]
    RecursiveWorks,

    #[error("Every work must be in the same company as it's parent work!")]
    ParentCompany,
}

impl WorkViolation {
    /// Stable name of the violated rule.
    pub fn name(&self) -> &'static str {
        match self {
            WorkViolation::RecursiveWorks => "recursive_works",
            WorkViolation::ParentCompany => "parent_company",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("work {work}: {violation}")]
    Violation { work: WorkId, violation: WorkViolation },
}

impl WorkError {
    pub fn violation(work: WorkId, violation: WorkViolation) -> Self {
        Self::Violation { work, violation }
    }
}
