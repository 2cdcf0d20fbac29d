//! Interval utilities over inclusive whole-day date ranges.
//!
//! This module provides the overlap test used everywhere in the engine,
//! a business-day counter, and the week/month bucketing used by the
//! dashboard grid.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Returns true if `[a_start, a_end]` and `[b_start, b_end]` share at least one day.
///
/// Both ranges are inclusive. Adjacent ranges (one ending the day before the
/// other starts) do not overlap.
///
/// # Example
///
/// ```
/// use allocation_engine::planning::is_overlapping;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
///
/// assert!(is_overlapping(d(1, 1), d(1, 10), d(1, 10), d(1, 20)));
/// assert!(!is_overlapping(d(1, 1), d(1, 9), d(1, 10), d(1, 20)));
/// ```
pub fn is_overlapping(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// Counts weekdays (Monday to Friday) in `[start, end]` inclusive.
///
/// Returns zero when `start > end`.
///
/// # Example
///
/// ```
/// use allocation_engine::planning::business_days;
/// use chrono::NaiveDate;
///
/// // Monday 2026-01-12 through Sunday 2026-01-18
/// let start = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 1, 18).unwrap();
/// assert_eq!(business_days(start, end), 5);
/// ```
pub fn business_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_weekday(*d))
        .count() as u32
}

pub(crate) fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns the day after `date`, or `None` at the end of the calendar.
pub(crate) fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

/// Returns the day before `date`, or `None` at the start of the calendar.
pub(crate) fn previous_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(1))
}

/// Formats an inclusive range the way conflict period labels are shown.
///
/// ```
/// use allocation_engine::planning::format_period;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(format_period(start, end), "2026-01-15 to 2026-03-01");
/// ```
pub fn format_period(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// One column of the monthly planning grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekBucket {
    /// 1-based index within the month.
    pub index: u32,
    /// Display label, e.g. `Week 1`.
    pub label: String,
    /// First day of the bucket.
    pub start: NaiveDate,
    /// Last day of the bucket (inclusive).
    pub end: NaiveDate,
}

/// Splits the month containing `date` into four consecutive 7-day buckets
/// starting on the 1st.
///
/// The buckets cover days 1 to 28. Days 29 onwards only appear in the
/// monthly view.
pub fn weeks_for_month(date: NaiveDate) -> Vec<WeekBucket> {
    let first = first_of_month(date);
    (0..4u32)
        .filter_map(|i| {
            let start = first.checked_add_days(Days::new(u64::from(i) * 7))?;
            let end = start.checked_add_days(Days::new(6))?;
            Some(WeekBucket {
                index: i + 1,
                label: format!("Week {}", i + 1),
                start,
                end,
            })
        })
        .collect()
}

/// Returns the inclusive `(first, last)` days of the month containing `date`.
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = first_of_month(date);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(previous_day)
        .unwrap_or(NaiveDate::MAX);
    (first, last)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
