// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Months, NaiveDate, Utc};

/// Number of calendar months covered by the monthly distance rollup.
pub const ROLLUP_WINDOW_MONTHS: u32 = 12;

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Start of the trailing rollup window: midnight of `today` minus twelve months.
///
/// Month arithmetic clamps to the end of shorter months (Feb 29 -> Feb 28).
pub fn rollup_window_start(today: NaiveDate) -> DateTime<Utc> {
    let start = today
        .checked_sub_months(Months::new(ROLLUP_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MIN);
    start_of_day(start)
}

/// Parse a date parameter given either as `YYYY-MM-DD` or as RFC 3339.
pub fn parse_date_or_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(start_of_day(date));
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rollup_window_start_is_midnight_twelve_months_back() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            rollup_window_start(today),
            Utc.with_ymd_and_hms(2025, 10, 18, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rollup_window_start_clamps_leap_day() {
        let today = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert_eq!(
            rollup_window_start(today),
            Utc.with_ymd_and_hms(2027, 2, 28, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_or_datetime() {
        assert_eq!(
            parse_date_or_datetime("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date_or_datetime("2024-03-05T10:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap())
        );
        assert_eq!(parse_date_or_datetime("yesterday"), None);
    }
}
