//! Date parsing and display helpers shared by views and transfer formats.
//!
//! # Invariants
//! - Local datetime strings (`2025-11-06T17:30`) are interpreted in the
//!   caller's time zone; date-only strings are UTC midnight.
//! - Parsing never fails loudly; unparseable input yields `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::fmt::Display;

/// Wire format of `followUp` values written by the add/edit form.
pub const FOLLOW_UP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Display format of `CreatedAt` in CSV exports, e.g. `11/14/2023, 10:13:20 PM`.
pub const CREATED_AT_DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

const LOCAL_DATETIME_FORMATS: &[&str] = &[
    FOLLOW_UP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y, %I:%M %p",
    "%m/%d/%Y, %H:%M:%S",
];

/// Parses a datetime string into `tz`.
///
/// Accepts RFC 3339 (with offset), local datetime forms including the CSV
/// display format, and ISO date-only values.
pub fn parse_datetime_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(tz));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .map(|utc| utc.with_timezone(tz))
}

/// Coerces an imported creation time to epoch milliseconds.
///
/// Digit-only values are taken as epoch milliseconds; other values go
/// through [`parse_datetime_in`]. Returns `fallback_ms` when neither works.
pub fn coerce_created_at<Tz: TimeZone>(value: &str, tz: &Tz, fallback_ms: i64) -> i64 {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(millis) = trimmed.parse::<i64>() {
            return millis;
        }
    }
    parse_datetime_in(trimmed, tz)
        .map(|parsed| parsed.timestamp_millis())
        .unwrap_or(fallback_ms)
}

/// Renders epoch milliseconds with [`CREATED_AT_DISPLAY_FORMAT`].
pub fn format_created_at<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(instant) => instant.format(CREATED_AT_DISPLAY_FORMAT).to_string(),
        None => "Invalid Date".to_string(),
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{coerce_created_at, format_created_at, parse_datetime_in};
    use chrono::{FixedOffset, TimeZone, Utc};

    #[test]
    fn parses_form_value_in_given_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let parsed = parse_datetime_in("2025-11-06T17:30", &tz).unwrap();
        assert_eq!(
            parsed,
            tz.with_ymd_and_hms(2025, 11, 6, 17, 30, 0).unwrap()
        );
    }

    #[test]
    fn parses_rfc3339_and_date_only() {
        let parsed = parse_datetime_in("2025-11-06T17:30:00Z", &Utc).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 11, 6, 17, 30, 0).unwrap());

        let date_only = parse_datetime_in("2025-11-06", &Utc).unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2025, 11, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert!(parse_datetime_in("", &Utc).is_none());
        assert!(parse_datetime_in("   ", &Utc).is_none());
        assert!(parse_datetime_in("next tuesday", &Utc).is_none());
    }

    #[test]
    fn display_format_parses_back() {
        let millis = Utc
            .with_ymd_and_hms(2023, 11, 14, 22, 13, 20)
            .unwrap()
            .timestamp_millis();
        let rendered = format_created_at(millis, &Utc);
        assert_eq!(rendered, "11/14/2023, 10:13:20 PM");
        assert_eq!(coerce_created_at(&rendered, &Utc, 0), millis);
    }

    #[test]
    fn coerce_created_at_accepts_epoch_millis_and_falls_back() {
        assert_eq!(coerce_created_at("1700000000000", &Utc, 7), 1_700_000_000_000);
        assert_eq!(coerce_created_at("not a date", &Utc, 7), 7);
        assert_eq!(coerce_created_at("", &Utc, 7), 7);
    }
}
