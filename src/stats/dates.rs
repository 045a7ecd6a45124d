//! Date arithmetic helpers for streak computation
//!
//! All operations are UTC-only. The process-local timezone must never leak
//! into streak math, so handlers convert `DateTime<Utc>` to a calendar date
//! here and do all day-stepping through `add_days`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Truncate an instant to its UTC calendar date.
pub fn calendar_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Calendar-correct day addition/subtraction across month and year boundaries.
///
/// UTC has no DST, so a day is always a day. Saturates at the chrono date
/// range limits rather than panicking.
pub fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(delta)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_calendar_date_truncates_time() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 6, 23, 59, 59).unwrap();
        assert_eq!(calendar_date(instant), d("2024-01-06"));

        let midnight = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();
        assert_eq!(calendar_date(midnight), d("2024-01-07"));
    }

    #[test]
    fn test_add_days_month_boundary() {
        assert_eq!(add_days(d("2024-01-31"), 1), d("2024-02-01"));
        assert_eq!(add_days(d("2024-03-01"), -1), d("2024-02-29")); // leap year
        assert_eq!(add_days(d("2023-03-01"), -1), d("2023-02-28"));
    }

    #[test]
    fn test_add_days_year_boundary() {
        assert_eq!(add_days(d("2023-12-31"), 1), d("2024-01-01"));
        assert_eq!(add_days(d("2024-01-01"), -1), d("2023-12-31"));
    }

    #[test]
    fn test_add_days_larger_deltas() {
        assert_eq!(add_days(d("2024-01-01"), 366), d("2025-01-01")); // 2024 is a leap year
        assert_eq!(add_days(d("2024-06-15"), 0), d("2024-06-15"));
    }
}
