//! Timestamp codec shared by every record
//!
//! The API emits UTC timestamps with second precision and a literal `Z`,
//! e.g. `2020-01-02T03:04:05Z`. Only that exact shape is accepted:
//! fractional seconds and numeric offsets are rejected.
//!
//! Use with `#[serde(with = "crate::date")]`, or `crate::date::option` for
//! optional fields.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};
use thiserror::Error;

/// Wire format for all timestamps
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a timestamp in the wire format
pub fn format(value: &DateTime<Utc>) -> String {
    value.format(FORMAT).to_string()
}

/// Length of every wire timestamp, `YYYY-MM-DDTHH:MM:SSZ`
const WIRE_LEN: usize = 20;

/// A string that is not a timestamp in the wire format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp {value:?}, expected YYYY-MM-DDTHH:MM:SSZ")]
pub struct InvalidTimestamp {
    pub value: String,
}

/// Parse a timestamp in the wire format
///
/// The input must be exactly what [`format`] produces for the parsed
/// instant: unpadded fields, padding spaces, signs and leap seconds all fail.
pub fn parse(value: &str) -> Result<DateTime<Utc>, InvalidTimestamp> {
    let invalid = || InvalidTimestamp {
        value: value.to_string(),
    };

    if value.len() != WIRE_LEN {
        return Err(invalid());
    }

    let parsed = NaiveDateTime::parse_from_str(value, FORMAT)
        .map_err(|_| invalid())?
        .and_utc();

    // chrono reads second 60 as a leap second carried in the nanoseconds
    if parsed.timestamp_subsec_nanos() != 0 || format(&parsed) != value {
        return Err(invalid());
    }

    Ok(parsed)
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

/// Same codec for `Option<DateTime<Utc>>`
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
