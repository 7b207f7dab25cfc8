use chrono::{Datelike, NaiveDate, Weekday};
use task_planner::calendar::{MAX_RANGE_DAYS, WorkCalendar};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn default_calendar_weekends_unavailable() {
    let cal = WorkCalendar::default();
    // 2025-01-04 is a Saturday, 2025-01-05 is a Sunday
    assert!(!cal.is_available(d(2025, 1, 4)));
    assert!(!cal.is_available(d(2025, 1, 5)));
}

#[test]
fn holidays_are_not_excluded() {
    let cal = WorkCalendar::default();
    // New Year's Day 2025 falls on a Wednesday
    assert!(cal.is_available(d(2025, 1, 1)));
    assert!(cal.is_available(d(2025, 12, 25)));
}

#[test]
fn available_days_in_range_is_inclusive_and_ordered() {
    let cal = WorkCalendar::default();
    let start = d(2025, 1, 6); // Mon
    let end = d(2025, 1, 10); // Fri
    let days = cal.available_days_in_range(start, end);
    assert_eq!(days.len(), 5);
    assert_eq!(days.first().copied().unwrap(), start);
    assert_eq!(days.last().copied().unwrap(), end);
    assert!(days.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(cal.count_available_days(start, end), days.len());
}

#[test]
fn range_spanning_weekends_skips_them() {
    let cal = WorkCalendar::default();
    let days = cal.available_days_in_range(d(2025, 1, 1), d(2025, 1, 31));
    assert_eq!(days.len(), 23);
    assert!(
        days.iter()
            .all(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
    );
}

#[test]
fn single_day_and_inverted_ranges() {
    let cal = WorkCalendar::default();
    assert_eq!(cal.available_days_in_range(d(2025, 1, 6), d(2025, 1, 6)), vec![d(2025, 1, 6)]);
    assert!(cal.available_days_in_range(d(2025, 1, 4), d(2025, 1, 4)).is_empty());
    assert!(cal.available_days_in_range(d(2025, 1, 10), d(2025, 1, 6)).is_empty());
}

#[test]
fn pathological_ranges_are_bounded() {
    let cal = WorkCalendar::default();
    let days = cal.available_days_in_range(d(2000, 1, 3), NaiveDate::MAX);
    assert!(!days.is_empty());
    assert!(days.len() as i64 <= MAX_RANGE_DAYS);
    let last_scanned = d(2000, 1, 3) + chrono::Duration::days(MAX_RANGE_DAYS - 1);
    assert!(*days.last().unwrap() <= last_scanned);
}

#[test]
fn range_ending_at_max_date_terminates() {
    let cal = WorkCalendar::default();
    let start = NaiveDate::MAX - chrono::Duration::days(10);
    let days = cal.available_days_in_range(start, NaiveDate::MAX);
    assert!(days.len() <= 11);
}
