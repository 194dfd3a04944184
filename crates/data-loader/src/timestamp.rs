//! Lenient (de)serialization for instants stored in user documents.
//!
//! Documents written by different clients carry timestamps in several
//! shapes. Accepted on input:
//! - RFC 3339 strings: "2024-01-10T21:30:00+01:00"
//! - Naive date-times, read as UTC: "2024-01-10T21:30:00"
//! - Plain dates, read as UTC midnight: "2024-01-10"
//! - Integer epoch milliseconds: 1704921000000
//! - Store timestamp objects: {"seconds": 1704921000, "nanoseconds": 0}
//!
//! Anything else decodes to `None`. A bad date only drops the record out
//! of date-based views; it never makes the whole document unreadable.
//! Output is always RFC 3339.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(instant) => {
            serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_value(&value))
}

/// Decode any supported JSON shape into an instant.
pub fn parse_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => DateTime::from_timestamp_millis(n.as_i64()?),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))?
                .as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// Parse a timestamp string in any of the accepted textual forms.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let instant = parse_timestamp("2024-01-10T21:30:00+01:00").unwrap();
        assert_eq!(instant.hour(), 20);
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        let instant = parse_timestamp("2024-03-05").unwrap();
        assert_eq!((instant.year(), instant.month(), instant.day()), (2024, 3, 5));
        assert_eq!(instant.hour(), 0);
    }

    #[test]
    fn test_parse_naive_datetime() {
        let instant = parse_timestamp("2024-03-05T18:45:10").unwrap();
        assert_eq!(instant.hour(), 18);
        assert_eq!(instant.minute(), 45);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_value(&json!(true)), None);
        assert_eq!(parse_value(&Value::Null), None);
    }

    #[test]
    fn test_parse_epoch_millis_and_store_object() {
        let from_millis = parse_value(&json!(1_704_921_000_000i64)).unwrap();
        let from_object = parse_value(&json!({"seconds": 1_704_921_000i64, "nanoseconds": 0})).unwrap();
        assert_eq!(from_millis, from_object);
    }
}
