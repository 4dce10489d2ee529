//! Shared, lock-protected record stores for tests/dev and embedding.

pub mod error;
pub mod move_store;
pub mod timesheet_ledger;
pub mod work_store;

pub use error::StoreError;
pub use move_store::InMemoryMoveStore;
pub use timesheet_ledger::InMemoryTimesheetLedger;
pub use work_store::InMemoryWorkStore;
