//! The persisted event record (spec §4.1/§4.2).

use serde::Deserialize;
use serde::Serialize;

/// A `(timestamp, sequence)` pair. Within a channel, cursors are strictly
/// increasing in publish order (spec §4.1 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub timestamp: i64,
    pub sequence: i64,
}

impl Cursor {
    pub fn new(timestamp: i64, sequence: i64) -> Self {
        Self { timestamp, sequence }
    }
}

/// A persisted, ordered event on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// `evt_<timestamp>_<sequence>`.
    pub id: String,
    pub channel: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub timestamp: i64,
    pub sequence: i64,
    pub payload: serde_json::Value,
}

impl Event {
    pub fn new(
        channel: impl Into<String>,
        event_type: impl Into<String>,
        timestamp: i64,
        sequence: i64,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: format!("evt_{timestamp}_{sequence}"),
            channel: channel.into(),
            event_type: event_type.into(),
            timestamp,
            sequence,
            payload,
        }
    }

    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.timestamp, self.sequence)
    }
}

#[cfg(test)]
#[path = "event.test.rs"]
mod tests;
