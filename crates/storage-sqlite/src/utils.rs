//! Parsing and formatting helpers for stored values.
//!
//! Dates and timestamps are stored as ISO-8601 text. The ingestion
//! pipeline is not the only writer of these columns historically, so the
//! timestamp parser accepts both `T` and space separators and a date-only
//! form.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::StorageError;

pub(crate) fn parse_date(value: &str, column: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| StorageError::Corrupt(format!("{column}: '{value}' ({e})")))
}

pub(crate) fn parse_datetime(value: &str, column: &str) -> Result<NaiveDateTime, StorageError> {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    // Date-only values mean midnight.
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    Err(StorageError::Corrupt(format!("{column}: '{value}'")))
}

pub(crate) fn parse_utc(value: &str, column: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("{column}: '{value}' ({e})")))
}

pub(crate) fn format_utc(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_datetime_accepts_common_forms() {
        assert!(parse_datetime("2026-03-01T10:30:00", "c").is_ok());
        assert!(parse_datetime("2026-03-01 10:30:00", "c").is_ok());
        assert!(parse_datetime("2026-03-01T10:30:00.123456", "c").is_ok());
        assert_eq!(parse_datetime("2026-03-01", "c").unwrap().hour(), 0);
        assert!(parse_datetime("March 1st", "c").is_err());
    }

    #[test]
    fn test_utc_round_trip() {
        let now = Utc::now();
        let parsed = parse_utc(&format_utc(&now), "c").unwrap();
        assert_eq!(parsed, now);
    }
}
