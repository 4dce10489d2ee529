//! Infrastructure layer: in-memory implementations of the persistence
//! collaborators the domain crates are written against.

pub mod store;

pub use store::{InMemoryMoveStore, InMemoryTimesheetLedger, InMemoryWorkStore, StoreError};
