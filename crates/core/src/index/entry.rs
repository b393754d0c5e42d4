//! Index entry type and its timestamp format.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Textual timestamp format: second precision, no timezone.
pub const TIME_FORMAT: &str = "%Y-%m-%d:%H:%M:%S";

/// A single registration: which identifier, and when it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntry {
    pub identifier: String,
    #[serde(with = "timestamp_format")]
    #[schemars(with = "String")]
    pub timestamp: NaiveDateTime,
}

impl CacheEntry {
    pub fn new(identifier: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self { identifier: identifier.into(), timestamp }
    }

    /// Timestamp rendered as `YYYY-MM-DD:HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIME_FORMAT).to_string()
}

/// Parse a timestamp written by [`format_timestamp`].
///
/// # Errors
///
/// Returns `Error::Corrupt` when the text does not match [`TIME_FORMAT`].
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, Error> {
    NaiveDateTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| Error::Corrupt(format!("invalid timestamp {raw:?}: {e}")))
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
