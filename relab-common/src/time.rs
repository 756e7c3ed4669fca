//! Spreadsheet date conversion
//!
//! Catalog workbooks use the 1904 date system: serial 0 is 1904-01-01 and the
//! fractional part is the time of day.

use chrono::{Duration, NaiveDate};

/// Convert a 1904-system serial date to a calendar date (time of day dropped)
///
/// Returns `None` for negative, non-finite or out-of-range serials.
pub fn serial_to_date_1904(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1904, 1, 1)?;
    epoch.checked_add_signed(Duration::try_days(serial.floor() as i64)?)
}

/// ISO-8601 (`YYYY-MM-DD`) rendering of a 1904-system serial date
pub fn serial_to_iso_date_1904(serial: f64) -> Option<String> {
    serial_to_date_1904(serial).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        assert_eq!(serial_to_iso_date_1904(0.0).as_deref(), Some("1904-01-01"));
    }

    #[test]
    fn test_time_of_day_is_dropped() {
        assert_eq!(serial_to_iso_date_1904(1.75).as_deref(), Some("1904-01-02"));
    }

    #[test]
    fn test_known_serial() {
        // 1904-01-01 + 43465 days
        assert_eq!(serial_to_iso_date_1904(43465.0).as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_invalid_serials() {
        assert!(serial_to_date_1904(-1.0).is_none());
        assert!(serial_to_date_1904(f64::NAN).is_none());
    }
}
