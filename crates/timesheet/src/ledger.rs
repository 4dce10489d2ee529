//! Hours logged against works.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockwork_core::{Context, WorkId};

/// One timesheet entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetLine {
    pub work: WorkId,
    pub date: NaiveDate,
    pub hours: f64,
}

/// Grouped access to timesheet lines.
pub trait HourLedger {
    /// Sum of hours per work for exactly `works`, restricted to the date
    /// window of `ctx`. Works without lines are absent from the result.
    fn hours_by_work(&self, works: &[WorkId], ctx: &Context) -> HashMap<WorkId, f64>;
}

impl HourLedger for [TimesheetLine] {
    fn hours_by_work(&self, works: &[WorkId], ctx: &Context) -> HashMap<WorkId, f64> {
        let wanted: HashSet<WorkId> = works.iter().copied().collect();
        let mut sums = HashMap::new();
        for line in self {
            if wanted.contains(&line.work) && ctx.includes(line.date) {
                *sums.entry(line.work).or_insert(0.0) += line.hours;
            }
        }
        sums
    }
}

impl HourLedger for Vec<TimesheetLine> {
    fn hours_by_work(&self, works: &[WorkId], ctx: &Context) -> HashMap<WorkId, f64> {
        self.as_slice().hours_by_work(works, ctx)
    }
}
