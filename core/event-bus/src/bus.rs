//! In-memory per-channel fan-out with bounded replay, composing with the
//! durable event log for late-subscriber replay (spec §4.2).

use std::collections::HashMap;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use futures::Stream;
use futures::StreamExt;
use relay_event_log::EventLog;
use relay_protocol::Cursor;
use relay_protocol::Event;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;
use tracing::warn;

/// Bounded replay buffer size (spec §4.2).
const REPLAY_BUFFER_SIZE: usize = 50;
/// Bounded replay buffer retention.
const REPLAY_BUFFER_RETENTION: Duration = Duration::from_secs(5 * 60);
/// Default broadcast channel capacity, matching the replay buffer size.
const BROADCAST_CAPACITY: usize = 50;

pub type EventStream = Pin<Box<dyn Stream<Item = Event> + Send>>;

struct SequenceState {
    last_timestamp: i64,
    last_sequence: i64,
}

struct ChannelState {
    sender: broadcast::Sender<Event>,
    buffer: Mutex<VecDeque<(tokio::time::Instant, Event)>>,
    sequence: Mutex<SequenceState>,
}

impl ChannelState {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            sender,
            buffer: Mutex::new(VecDeque::new()),
            sequence: Mutex::new(SequenceState {
                last_timestamp: i64::MIN,
                last_sequence: -1,
            }),
        }
    }

    async fn next_cursor(&self, timestamp: i64) -> (i64, i64) {
        let mut seq = self.sequence.lock().await;
        let sequence = if timestamp > seq.last_timestamp { 0 } else { seq.last_sequence + 1 };
        seq.last_timestamp = timestamp.max(seq.last_timestamp);
        seq.last_sequence = sequence;
        (seq.last_timestamp, sequence)
    }

    async fn push_buffer(&self, event: Event) {
        let mut buffer = self.buffer.lock().await;
        let now = tokio::time::Instant::now();
        buffer.push_back((now, event));
        while buffer.len() > REPLAY_BUFFER_SIZE {
            buffer.pop_front();
        }
        while buffer.front().is_some_and(|(inserted, _)| now.duration_since(*inserted) > REPLAY_BUFFER_RETENTION) {
            buffer.pop_front();
        }
    }

    async fn buffered_events(&self) -> Vec<Event> {
        self.buffer.lock().await.iter().map(|(_, e)| e.clone()).collect()
    }
}

/// Summary of one channel's current state.
#[derive(Debug, Clone, PartialEq)]
pub struct BusChannelInfo {
    pub subscriber_count: usize,
    pub buffered_count: usize,
}

/// In-memory pub/sub fan-out for [`Event`]s, optionally backed by a durable
/// [`EventLog`] for replay beyond what the bounded buffer retains.
///
/// Grounded in the teacher's `features/hooks::HookRegistry` (`RwLock<Vec<..>>`
/// guarding concurrent registration/dispatch), generalized here to a
/// per-channel `tokio::sync::broadcast` fan-out.
pub struct EventBus {
    log: Option<Arc<dyn EventLog>>,
    channels: RwLock<HashMap<String, Arc<ChannelState>>>,
}

impl EventBus {
    pub fn new(log: Option<Arc<dyn EventLog>>) -> Self {
        Self {
            log,
            channels: RwLock::new(HashMap::new()),
        }
    }

    async fn channel(&self, name: &str) -> Arc<ChannelState> {
        if let Some(state) = self.channels.read().await.get(name) {
            return state.clone();
        }
        let mut guard = self.channels.write().await;
        guard.entry(name.to_string()).or_insert_with(|| Arc::new(ChannelState::new())).clone()
    }

    /// Assigns `(timestamp, sequence)`, fans the event out to live
    /// subscribers (non-blocking), and asynchronously persists it.
    /// Persistence failures are logged, never propagated (spec §4.2).
    pub async fn publish(&self, channel: &str, event_type: impl Into<String>, payload: serde_json::Value) -> Event {
        let state = self.channel(channel).await;
        let now = now_ms();
        let (timestamp, sequence) = state.next_cursor(now).await;
        let event = Event::new(channel, event_type, timestamp, sequence, payload);

        state.push_buffer(event.clone()).await;
        // A broadcast send failing means there are no live subscribers; that
        // is not an error for the publisher.
        let _ = state.sender.send(event.clone());

        if let Some(log) = self.log.clone() {
            let channel = channel.to_string();
            let event_for_log = event.clone();
            tokio::spawn(async move {
                if let Err(err) = log.save(&channel, event_for_log).await {
                    warn!(channel, %err, "event log persistence failed");
                }
            });
        }
        debug!(channel, timestamp, sequence, "published event");
        event
    }

    /// Lazily replays from `from_cursor` (when set, via the durable log)
    /// then switches to live; without a cursor, replays whatever the
    /// bounded in-memory buffer retains, then switches to live.
    pub async fn subscribe(&self, channel: &str, from_cursor: Option<Cursor>) -> EventStream {
        let state = self.channel(channel).await;
        // Subscribe before computing the replay prefix so no live event
        // published during replay computation is missed (duplicates across
        // the seam are expected and deduped by the client, spec §4.2).
        let live = BroadcastStream::new(state.sender.subscribe());

        let replay = match (from_cursor, &self.log) {
            (Some(cursor), Some(log)) => log.read_from(channel, Some(cursor), 100).await.unwrap_or_else(|err| {
                warn!(channel, %err, "event log replay failed, falling back to buffer");
                Vec::new()
            }),
            _ => state.buffered_events().await,
        };

        chain_replay_and_live(replay, live)
    }

    /// Replays the last `last_n` persisted events (chronological), then
    /// switches to live. Known property: clients may observe duplicates
    /// where the persisted tail overlaps the in-memory buffer (spec §4.2).
    pub async fn subscribe_with_history(&self, channel: &str, last_n: usize) -> EventStream {
        let state = self.channel(channel).await;
        let live = BroadcastStream::new(state.sender.subscribe());

        let replay = match &self.log {
            Some(log) => log.read_latest(channel, last_n).await.unwrap_or_else(|err| {
                warn!(channel, %err, "event log replay failed, falling back to buffer");
                Vec::new()
            }),
            None => {
                let buffered = state.buffered_events().await;
                let skip = buffered.len().saturating_sub(last_n);
                buffered.into_iter().skip(skip).collect()
            }
        };

        chain_replay_and_live(replay, live)
    }

    pub async fn info(&self, channel: &str) -> BusChannelInfo {
        let state = self.channel(channel).await;
        BusChannelInfo {
            subscriber_count: state.sender.receiver_count(),
            buffered_count: state.buffer.lock().await.len(),
        }
    }

    /// Drops the in-memory buffer for `channel`; subscribers already
    /// holding a receiver are unaffected.
    pub async fn cleanup_channel(&self, channel: &str) {
        if let Some(state) = self.channels.read().await.get(channel) {
            state.buffer.lock().await.clear();
        }
    }

    /// Drops all channels with no current subscribers.
    pub async fn cleanup(&self) {
        let mut guard = self.channels.write().await;
        guard.retain(|_, state| state.sender.receiver_count() > 0);
    }

    /// Removes a channel unconditionally, regardless of subscribers.
    pub async fn destroy(&self, channel: &str) {
        self.channels.write().await.remove(channel);
    }
}

fn chain_replay_and_live(
    replay: Vec<Event>,
    live: BroadcastStream<Event>,
) -> EventStream {
    let live = live.filter_map(|item| async move {
        match item {
            Ok(event) => Some(event),
            Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(n)) => {
                warn!(skipped = n, "subscriber lagged behind live event stream");
                None
            }
        }
    });
    Box::pin(futures::stream::iter(replay).chain(live))
}

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

#[cfg(test)]
#[path = "bus.test.rs"]
mod tests;
