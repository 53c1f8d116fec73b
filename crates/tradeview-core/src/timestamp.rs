//! Lenient timestamp decoding.
//!
//! The server has shipped timestamps in several shapes over time: RFC 3339
//! strings from the broker API, HTTP dates from Flask's JSON encoder, bare
//! `datetime.isoformat()` strings and epoch milliseconds. Zoned layouts and
//! epoch values decode into [`Timestamp::At`]. Layouts without a zone decode
//! into [`Timestamp::Naive`] and are read as wall-clock time in the display
//! zone, the way a browser's `new Date(...)` reads them as local time.
//! Anything else is kept verbatim so the view can still render something
//! for it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Layouts without a zone, tried after the zoned ones.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Timestamp carried by a push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamp {
    /// A point in time the decoder understood.
    At(DateTime<Utc>),
    /// Wall-clock time with no zone attached.
    Naive(NaiveDateTime),
    /// Raw value that matched no known layout.
    Unparsed(String),
}

impl Timestamp {
    /// Parse a textual timestamp.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::At(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
            return Self::At(dt.with_timezone(&Utc));
        }
        // Python's str(datetime) with an offset: "2024-05-14 13:30:00+00:00"
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Self::At(dt.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::Naive(naive);
            }
        }

        Self::Unparsed(raw.to_string())
    }

    /// Build from Unix epoch milliseconds.
    pub fn from_millis(ms: i64) -> Self {
        match DateTime::from_timestamp_millis(ms) {
            Some(dt) => Self::At(dt),
            None => Self::Unparsed(ms.to_string()),
        }
    }

    /// The decoded instant. `None` for naive and unparsed values, which
    /// need a display zone to pin down.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::At(dt) => Some(*dt),
            Self::Naive(_) | Self::Unparsed(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::At(dt)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Millis(ms) => Self::from_millis(ms),
            RawTimestamp::Float(ms) => Self::from_millis(ms as i64),
            RawTimestamp::Text(text) => Self::parse(&text),
        })
    }
}
