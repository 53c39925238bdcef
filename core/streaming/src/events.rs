//! Publishes a [`StreamEvent`] onto a session's Event Bus channel, deriving
//! the channel's `event_type` tag from the event's own `#[serde(tag =
//! "type")]` discriminant so the two can never drift apart.

use relay_event_bus::EventBus;
use relay_protocol::StreamEvent;

pub async fn emit(event_bus: &EventBus, session_id: &str, event: StreamEvent) {
    let payload = serde_json::to_value(&event).expect("StreamEvent always serializes");
    let event_type = payload.get("type").and_then(|v| v.as_str()).unwrap_or("unknown").to_string();
    event_bus.publish(session_id, event_type, payload).await;
}

#[cfg(test)]
#[path = "events.test.rs"]
mod tests;
