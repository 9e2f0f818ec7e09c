//! Date-key formatting and range iteration.
//!
//! Bucket keys embed dates as `YYYY-MM-DD`. Parsing and formatting live
//! here so the inventory, backup and stats crates agree on one format.

use chrono::{NaiveDate, Weekday};

use crate::error::ValidationError;

/// The on-disk date format for bucket keys and confirmation maps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a date as a `YYYY-MM-DD` key fragment.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` string, rejecting anything else.
///
/// Stricter than chrono's parser, which accepts unpadded months and days.
/// Only the canonical zero-padded form names a bucket.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDateKey(s.to_string()))?;
    if format_date(date) != s {
        return Err(ValidationError::InvalidDateKey(s.to_string()));
    }
    Ok(date)
}

/// Iterate every date from `start` through `end`, inclusive. Empty when
/// `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Number of days in the inclusive range, zero when `start > end`.
pub fn range_len_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}

/// Full English weekday name, for display in reports.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
