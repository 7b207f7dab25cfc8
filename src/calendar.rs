use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

/// Upper bound on the number of calendar days scanned for a single range.
pub const MAX_RANGE_DAYS: i64 = 36_600;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkCalendar {
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    /// Check if a date is available for scheduling
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
    }

    /// Get all available days in a date range (inclusive).
    ///
    /// An inverted range yields no days. At most [`MAX_RANGE_DAYS`] calendar
    /// days are scanned starting from `start`.
    pub fn available_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;
        let mut scanned = 0;

        while current <= end && scanned < MAX_RANGE_DAYS {
            if self.is_available(current) {
                days.push(current);
            }
            match current.checked_add_signed(Duration::days(1)) {
                Some(next) => current = next,
                None => break,
            }
            scanned += 1;
        }
        days
    }

    /// Count available days in a date range
    pub fn count_available_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        self.available_days_in_range(start, end).len()
    }
}
