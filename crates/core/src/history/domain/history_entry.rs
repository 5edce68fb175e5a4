use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::detection::domain::emotion::Emotion;

/// One logged face detection. Field order is the export column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    /// 1-based position of the face within its analysis call.
    pub face: u32,
    pub emotion: Emotion,
    /// Dominant-emotion confidence on a 0-100 scale, two decimals.
    pub confidence: f64,
}

impl HistoryEntry {
    /// Truncates the timestamp to whole seconds and rounds the confidence
    /// to two decimals.
    pub fn new(timestamp: NaiveDateTime, face: u32, emotion: Emotion, confidence: f64) -> Self {
        Self {
            timestamp: timestamp.with_nanosecond(0).unwrap_or(timestamp),
            face,
            emotion,
            confidence: round2(confidence),
        }
    }
}

/// Rounds on the exact decimal expansion, so values stored just below a
/// half (82.345 is 82.3449...) round down.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
