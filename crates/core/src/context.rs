//! Explicit per-call context.
//!
//! Operations that depend on "who is asking" or "for which period" receive a
//! [`Context`] argument instead of reading ambient transaction state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::CompanyId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Active company, used as the default owner of new records.
    pub company: Option<CompanyId>,
    /// Inclusive lower bound of the date window.
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound of the date window.
    pub to_date: Option<NaiveDate>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_company(company: CompanyId) -> Self {
        Self {
            company: Some(company),
            ..Self::default()
        }
    }

    pub fn with_window(mut self, from_date: Option<NaiveDate>, to_date: Option<NaiveDate>) -> Self {
        self.from_date = from_date;
        self.to_date = to_date;
        self
    }

    /// Whether `date` falls inside the (possibly open-ended) window.
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.from_date.is_none_or(|from| date >= from) && self.to_date.is_none_or(|to| date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn open_window_includes_everything() {
        assert!(Context::new().includes(day(1)));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let ctx = Context::new().with_window(Some(day(5)), Some(day(10)));
        assert!(!ctx.includes(day(4)));
        assert!(ctx.includes(day(5)));
        assert!(ctx.includes(day(10)));
        assert!(!ctx.includes(day(11)));
    }

    #[test]
    fn half_open_window() {
        let ctx = Context::new().with_window(None, Some(day(10)));
        assert!(ctx.includes(day(1)));
        assert!(!ctx.includes(day(11)));
    }
}
