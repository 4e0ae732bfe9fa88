//! Processing window
//!
//! Monitoring always looks at the summer (June 1 - August 31) of the year
//! before the work item's reference date.

use chrono::{Datelike, NaiveDate};

/// Inclusive date range a work item is processed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProcessingWindow {
    /// June 1 to August 31 of `year`
    pub fn for_year(year: i32) -> Self {
        Self {
            start: summer_date(year, 6, 1),
            end: summer_date(year, 8, 31),
        }
    }

    /// Window for the year preceding `reference_date`
    pub fn for_reference_date(reference_date: NaiveDate) -> Self {
        Self::for_year(reference_date.year() - 1)
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The same window moved by `years` (negative moves back)
    pub fn shifted(&self, years: i32) -> Self {
        Self::for_year(self.year() + years)
    }
}

// June 1 and August 31 exist in every year, so only an out-of-range year can fail.
fn summer_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}
