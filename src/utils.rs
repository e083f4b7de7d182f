// Utility functions
use chrono::{Duration, NaiveDate};

/// Days of history requested from the trend API.
pub const TREND_LOOKBACK_DAYS: i64 = 30;

/// Formats a date the way the trend API expects it (`YYYY-MM-DD`).
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the `(startDate, endDate)` pair covering the last 30 days up to `today`.
pub fn trend_window(today: NaiveDate) -> (String, String) {
    let start = today - Duration::days(TREND_LOOKBACK_DAYS);
    (format_date(start), format_date(today))
}
