//! Timestamp interchange format.
//!
//! # Responsibility
//! - Define the single textual format used by the data file and tool output.
//! - Parse the lenient input shapes callers tend to send.
//!
//! # Invariants
//! - Formatting then parsing yields the same instant (nanosecond precision).
//! - Absent timestamps serialize as `null`, never as an empty string.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// Canonical output format: ISO-8601 local time, fraction only when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Human-readable shape echoed back to callers that send malformed dates.
pub const TIMESTAMP_HINT: &str = "YYYY-MM-DDTHH:MM:SS (e.g., 2026-02-10T14:00:00)";

const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Current local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses one timestamp.
///
/// Accepts the canonical format, minute precision, a space separator, a bare
/// date (midnight) and RFC 3339 with an offset (kept as its wall-clock time).
/// Returns `None` for blank or unparsable text.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ACCEPTED_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_local());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_timestamp(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{text}`")))
}

/// Serde helpers for optional timestamps (`null` when absent).
pub mod option {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&format_timestamp(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Empty strings are read as absent, matching files written by older builds.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse_timestamp(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn canonical_format_omits_zero_fraction() {
        let value = NaiveDate::from_ymd_opt(2026, 2, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(format_timestamp(&value), "2026-02-10T14:00:00");
    }

    #[test]
    fn format_then_parse_keeps_sub_second_precision() {
        let value = NaiveDate::from_ymd_opt(2026, 2, 10)
            .unwrap()
            .and_hms_micro_opt(9, 30, 15, 123_456)
            .unwrap();
        let text = format_timestamp(&value);
        assert_eq!(parse_timestamp(&text), Some(value));
    }

    #[test]
    fn accepts_lenient_shapes() {
        let midnight = parse_timestamp("2026-03-01").unwrap();
        assert_eq!(midnight.hour(), 0);

        let minutes = parse_timestamp("2026-03-01 08:15").unwrap();
        assert_eq!(minutes.minute(), 15);

        let offset = parse_timestamp("2026-03-01T08:15:00+02:00").unwrap();
        assert_eq!(offset.hour(), 8);
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2026-13-40"), None);
    }
}
