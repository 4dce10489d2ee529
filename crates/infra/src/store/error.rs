use thiserror::Error;

use stockwork_core::{DomainError, MoveId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{store} lock poisoned")]
    Poisoned { store: &'static str },

    #[error("constraint violated on move {move_id}: {message}")]
    Constraint { move_id: MoveId, message: String },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Poisoned { .. } => DomainError::conflict(err.to_string()),
            StoreError::Constraint { message, .. } => DomainError::invariant(message),
        }
    }
}
