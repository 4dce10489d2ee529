//! Accounting records (double-entry account move lines).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod move_line;

pub use move_line::{Account, AccountKind, AccountMoveLine, ensure_balanced, totals};
