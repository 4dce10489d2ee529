//! Timesheet works: a per-company hierarchy of work nodes that time is
//! logged against, with hour totals rolled up the tree.

pub mod actions;
pub mod error;
pub mod ledger;
pub mod repository;
pub mod tree;
pub mod work;

pub use actions::{ActWindow, OpenWork, open_work_graph};
pub use error::{WorkError, WorkViolation};
pub use ledger::{HourLedger, TimesheetLine};
pub use repository::WorkRepository;
pub use tree::WorkTree;
pub use work::Work;
