//! Durable append-only event storage, keyed by channel (spec §4.1).

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use relay_protocol::Cursor;
use relay_protocol::Event;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::warn;

use crate::error::Result;
use crate::error::event_log_error::IoSnafu;
use crate::error::event_log_error::StorageFailedSnafu;
use snafu::ResultExt;

/// Snapshot summary of one channel (spec §4.1 `info`).
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub length: u64,
    pub first_id: Option<String>,
    pub last_id: Option<String>,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
}

impl ChannelInfo {
    fn from_events(events: &[Event]) -> Self {
        Self {
            length: events.len() as u64,
            first_id: events.first().map(|e| e.id.clone()),
            last_id: events.last().map(|e| e.id.clone()),
            first_timestamp: events.first().map(|e| e.timestamp),
            last_timestamp: events.last().map(|e| e.timestamp),
        }
    }
}

/// Contract implemented by every event log backend.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append one event. Must retry transient "busy" conditions with
    /// exponential backoff (base 50ms, cap 5 attempts) before failing with
    /// `StorageFailed`.
    async fn save(&self, channel: &str, event: Event) -> Result<()>;

    /// Events strictly greater than `cursor` (inclusive if omitted), up to
    /// `limit`, ascending.
    async fn read_from(&self, channel: &str, cursor: Option<Cursor>, limit: usize) -> Result<Vec<Event>>;

    /// The last `n` events, returned in ascending order.
    async fn read_latest(&self, channel: &str, n: usize) -> Result<Vec<Event>>;

    /// Closed interval `[start, end]` on `(timestamp, sequence)`.
    async fn read_range(&self, channel: &str, start: Cursor, end: Cursor, limit: usize) -> Result<Vec<Event>>;

    /// Drop all events strictly older than `before_timestamp`. Returns the
    /// count removed.
    async fn cleanup(&self, before_timestamp: i64) -> Result<u64>;

    /// Retain only the last `keep_last` events on `channel`. Returns the
    /// count removed.
    async fn cleanup_channel(&self, channel: &str, keep_last: usize) -> Result<u64>;

    async fn info(&self, channel: &str) -> Result<ChannelInfo>;
}

const MAX_RETRY_ATTEMPTS: u32 = 5;
const RETRY_BASE_MS: u64 = 50;

fn is_busy(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
    )
}

/// Retries `op` with exponential backoff (`50 * 2^attempt` ms, cap 5
/// attempts) while the underlying IO error looks transient (spec §9 "Retry
/// policy on storage busy").
async fn retry_busy<F, Fut, T>(channel: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::io::Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if is_busy(&err) && attempt < MAX_RETRY_ATTEMPTS => {
                let delay = RETRY_BASE_MS * 2u64.pow(attempt);
                warn!(channel, attempt, delay_ms = delay, "event log busy, retrying");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(StorageFailedSnafu {
                    channel: channel.to_string(),
                    message: err.to_string(),
                }
                .build());
            }
        }
    }
}

/// Filesystem-backed [`EventLog`]: one JSON-lines file per channel under
/// `base_dir`, mirrored by an in-memory index for fast range queries.
///
/// Grounded in the atomic-write-then-rename pattern used by
/// `relay-config`'s loader and the teacher's per-entity JSON persistence
/// (`app/session/src/persistence.rs`), generalized here to an append-only
/// per-channel log instead of whole-file replacement.
pub struct JsonlEventLog {
    base_dir: PathBuf,
    channels: RwLock<HashMap<String, Vec<Event>>>,
}

impl JsonlEventLog {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            channels: RwLock::new(HashMap::new()),
        }
    }

    fn channel_path(&self, channel: &str) -> PathBuf {
        self.base_dir.join(format!("{}.jsonl", sanitize(channel)))
    }

    async fn load_channel(&self, channel: &str) -> Result<Vec<Event>> {
        if let Some(events) = self.channels.read().await.get(channel) {
            return Ok(events.clone());
        }
        let path = self.channel_path(channel);
        let events = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_lines(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                return Err(IoSnafu {
                    message: err.to_string(),
                }
                .build());
            }
        };
        self.channels.write().await.insert(channel.to_string(), events.clone());
        Ok(events)
    }

    async fn rewrite_channel(&self, channel: &str, events: &[Event]) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_dir).await.with_context(|_| IoSnafu {
            message: format!("creating event log directory {}", self.base_dir.display()),
        })?;
        let path = self.channel_path(channel);
        let tmp_path = self.channel_path(&format!("{channel}.tmp"));
        let mut buf = String::new();
        for event in events {
            buf.push_str(&serde_json::to_string(event).unwrap_or_default());
            buf.push('\n');
        }
        retry_busy(channel, || {
            let buf = buf.clone();
            let tmp_path = tmp_path.clone();
            let path = path.clone();
            async move {
                let mut file = tokio::fs::File::create(&tmp_path).await?;
                file.write_all(buf.as_bytes()).await?;
                file.sync_all().await?;
                tokio::fs::rename(&tmp_path, &path).await?;
                Ok(())
            }
        })
        .await?;
        self.channels.write().await.insert(channel.to_string(), events.to_vec());
        Ok(())
    }
}

fn parse_lines(contents: &str) -> Result<Vec<Event>> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|err| {
                crate::error::event_log_error::CorruptSnafu {
                    message: err.to_string(),
                }
                .build()
            })
        })
        .collect()
}

fn sanitize(channel: &str) -> String {
    channel
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn position(events: &[Event], cursor: Cursor) -> usize {
    events.partition_point(|e| (e.timestamp, e.sequence) <= (cursor.timestamp, cursor.sequence))
}

#[async_trait]
impl EventLog for JsonlEventLog {
    async fn save(&self, channel: &str, event: Event) -> Result<()> {
        let mut events = self.load_channel(channel).await?;
        events.push(event);
        self.rewrite_channel(channel, &events).await?;
        debug!(channel, len = events.len(), "event log appended");
        Ok(())
    }

    async fn read_from(&self, channel: &str, cursor: Option<Cursor>, limit: usize) -> Result<Vec<Event>> {
        let events = self.load_channel(channel).await?;
        let start = match cursor {
            Some(cursor) => position(&events, cursor),
            None => 0,
        };
        Ok(events.into_iter().skip(start).take(limit).collect())
    }

    async fn read_latest(&self, channel: &str, n: usize) -> Result<Vec<Event>> {
        let events = self.load_channel(channel).await?;
        if n == 0 {
            return Ok(Vec::new());
        }
        let skip = events.len().saturating_sub(n);
        Ok(events.into_iter().skip(skip).collect())
    }

    async fn read_range(&self, channel: &str, start: Cursor, end: Cursor, limit: usize) -> Result<Vec<Event>> {
        let events = self.load_channel(channel).await?;
        Ok(events
            .into_iter()
            .filter(|e| {
                let pos = (e.timestamp, e.sequence);
                pos >= (start.timestamp, start.sequence) && pos <= (end.timestamp, end.sequence)
            })
            .take(limit)
            .collect())
    }

    async fn cleanup(&self, before_timestamp: i64) -> Result<u64> {
        let mut channels: std::collections::HashSet<String> = {
            let guard = self.channels.read().await;
            guard.keys().cloned().collect()
        };
        if let Ok(mut dir) = tokio::fs::read_dir(&self.base_dir).await {
            while let Ok(Some(entry)) = dir.next_entry().await {
                if let Some(name) = entry.path().file_stem().and_then(|s| s.to_str()) {
                    channels.insert(name.to_string());
                }
            }
        }
        let mut removed = 0u64;
        for channel in channels {
            let events = self.load_channel(&channel).await?;
            let kept: Vec<Event> = events.iter().filter(|e| e.timestamp >= before_timestamp).cloned().collect();
            removed += (events.len() - kept.len()) as u64;
            if kept.len() != events.len() {
                self.rewrite_channel(&channel, &kept).await?;
            }
        }
        Ok(removed)
    }

    async fn cleanup_channel(&self, channel: &str, keep_last: usize) -> Result<u64> {
        let events = self.load_channel(channel).await?;
        if events.len() <= keep_last {
            return Ok(0);
        }
        let removed = events.len() - keep_last;
        let kept = events[removed..].to_vec();
        self.rewrite_channel(channel, &kept).await?;
        Ok(removed as u64)
    }

    async fn info(&self, channel: &str) -> Result<ChannelInfo> {
        let events = self.load_channel(channel).await?;
        Ok(ChannelInfo::from_events(&events))
    }
}

/// An in-memory-only [`EventLog`], used by tests and by channels that opt
/// out of durability (spec §4.2 "a channel with no persistence configured").
#[derive(Default)]
pub struct InMemoryEventLog {
    channels: RwLock<HashMap<String, Vec<Event>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn save(&self, channel: &str, event: Event) -> Result<()> {
        self.channels.write().await.entry(channel.to_string()).or_default().push(event);
        Ok(())
    }

    async fn read_from(&self, channel: &str, cursor: Option<Cursor>, limit: usize) -> Result<Vec<Event>> {
        let guard = self.channels.read().await;
        let events = guard.get(channel).cloned().unwrap_or_default();
        let start = match cursor {
            Some(cursor) => position(&events, cursor),
            None => 0,
        };
        Ok(events.into_iter().skip(start).take(limit).collect())
    }

    async fn read_latest(&self, channel: &str, n: usize) -> Result<Vec<Event>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let guard = self.channels.read().await;
        let events = guard.get(channel).cloned().unwrap_or_default();
        let skip = events.len().saturating_sub(n);
        Ok(events.into_iter().skip(skip).collect())
    }

    async fn read_range(&self, channel: &str, start: Cursor, end: Cursor, limit: usize) -> Result<Vec<Event>> {
        let guard = self.channels.read().await;
        let events = guard.get(channel).cloned().unwrap_or_default();
        Ok(events
            .into_iter()
            .filter(|e| {
                let pos = (e.timestamp, e.sequence);
                pos >= (start.timestamp, start.sequence) && pos <= (end.timestamp, end.sequence)
            })
            .take(limit)
            .collect())
    }

    async fn cleanup(&self, before_timestamp: i64) -> Result<u64> {
        let mut guard = self.channels.write().await;
        let mut removed = 0u64;
        for events in guard.values_mut() {
            let before = events.len();
            events.retain(|e| e.timestamp >= before_timestamp);
            removed += (before - events.len()) as u64;
        }
        Ok(removed)
    }

    async fn cleanup_channel(&self, channel: &str, keep_last: usize) -> Result<u64> {
        let mut guard = self.channels.write().await;
        let Some(events) = guard.get_mut(channel) else {
            return Ok(0);
        };
        if events.len() <= keep_last {
            return Ok(0);
        }
        let removed = events.len() - keep_last;
        events.drain(0..removed);
        Ok(removed as u64)
    }

    async fn info(&self, channel: &str) -> Result<ChannelInfo> {
        let guard = self.channels.read().await;
        Ok(ChannelInfo::from_events(guard.get(channel).map(Vec::as_slice).unwrap_or_default()))
    }
}

#[cfg(test)]
#[path = "store.test.rs"]
mod tests;
