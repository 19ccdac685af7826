//! Wire encoding for task timestamps.
//!
//! In memory timestamps are epoch milliseconds. The persisted blob carries
//! them as RFC 3339 strings in UTC with millisecond precision
//! (`2024-01-01T10:00:00.000Z`). Decoding also accepts bare epoch-ms
//! integers and date-only `YYYY-MM-DD` values (midnight UTC).

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// Formats epoch milliseconds as an RFC 3339 UTC string.
pub fn format_epoch_ms(value: i64) -> Result<String, String> {
    DateTime::<Utc>::from_timestamp_millis(value)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| format!("timestamp {value} is out of range"))
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date into epoch milliseconds.
pub fn parse_epoch_ms(value: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.timestamp_millis());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
        .ok_or_else(|| format!("invalid timestamp `{trimmed}`"))
}

fn decode(raw: RawTimestamp) -> Result<i64, String> {
    match raw {
        RawTimestamp::Millis(value) => Ok(value),
        RawTimestamp::Text(text) => parse_epoch_ms(text.as_str()),
    }
}

/// `#[serde(with = "rfc3339")]` for required timestamps.
pub mod rfc3339 {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let text = format_epoch_ms(*value).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(text.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        decode(RawTimestamp::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "rfc3339_opt")]` for optional timestamps.
///
/// `null` and blank strings decode as `None`.
pub mod rfc3339_opt {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::rfc3339::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(raw) => decode(raw).map(Some).map_err(serde::de::Error::custom),
        }
    }
}
