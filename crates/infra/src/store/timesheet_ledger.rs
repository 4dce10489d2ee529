use std::collections::HashMap;
use std::sync::RwLock;

use stockwork_core::{Context, WorkId};
use stockwork_timesheet::{HourLedger, TimesheetLine};

/// In-memory timesheet lines for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryTimesheetLedger {
    inner: RwLock<Vec<TimesheetLine>>,
}

impl InMemoryTimesheetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, line: TimesheetLine) {
        if let Ok(mut lines) = self.inner.write() {
            lines.push(line);
        }
    }

    /// Drop every line logged against `work`.
    pub fn clear_work(&self, work: WorkId) {
        if let Ok(mut lines) = self.inner.write() {
            lines.retain(|l| l.work != work);
        }
    }
}

impl HourLedger for InMemoryTimesheetLedger {
    fn hours_by_work(&self, works: &[WorkId], ctx: &Context) -> HashMap<WorkId, f64> {
        match self.inner.read() {
            Ok(lines) => lines.as_slice().hours_by_work(works, ctx),
            Err(_) => HashMap::new(),
        }
    }
}
