//! Lenient decoding of backend timestamps.
//!
//! The movements endpoint is not consistent about how it writes dates: some
//! records carry RFC 3339 timestamps, older ones naive `YYYY-MM-DDTHH:MM:SS`
//! values, and expiration dates are frequently bare `YYYY-MM-DD`. Naive values
//! are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp.
///
/// Returns `None` when the value matches none of the accepted shapes.
///
/// ```
/// use pae_stock_core::wire::parse_timestamp;
///
/// assert!(parse_timestamp("2024-03-01T08:30:00Z").is_some());
/// assert!(parse_timestamp("2024-03-01T08:30:00.250").is_some());
/// assert!(parse_timestamp("2024-03-01").is_some());
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` adapter for a required timestamp field.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// `deserialize_with` adapter for a nullable timestamp field.
///
/// Empty strings are treated as null.
pub(crate) fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_rfc3339_with_offset_is_converted_to_utc() {
        let ts = parse_timestamp("2024-05-10T07:00:00-05:00").unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.day(), 10);
    }

    #[test]
    fn test_naive_space_separated() {
        let ts = parse_timestamp("2024-05-10 07:15:00").unwrap();
        assert_eq!(ts.minute(), 15);
    }

    #[test]
    fn test_bare_date_is_midnight() {
        let ts = parse_timestamp(" 2024-12-31 ").unwrap();
        assert_eq!(ts.month(), 12);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("31/12/2024").is_none());
    }
}
