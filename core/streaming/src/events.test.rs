use futures::StreamExt;
use relay_event_bus::EventBus;
use relay_protocol::StreamEvent;

use super::*;

#[tokio::test]
async fn derives_the_event_bus_tag_from_the_stream_event_variant() {
    let event_bus = EventBus::new(None);
    let mut stream = event_bus.subscribe("s1", None).await;

    emit(&event_bus, "s1", StreamEvent::Complete { usage: None, finish_reason: Some("stop".to_string()) }).await;
    let event = stream.next().await.expect("event was published");
    assert_eq!(event.event_type, "complete");

    emit(&event_bus, "s1", StreamEvent::SessionCreated { session_id: "s1".to_string(), provider: "anthropic".to_string(), model: "claude".to_string() }).await;
    let event = stream.next().await.expect("event was published");
    assert_eq!(event.event_type, "session-created");
}

#[tokio::test]
async fn payload_round_trips_through_serde() {
    let event_bus = EventBus::new(None);
    let mut stream = event_bus.subscribe("s1", None).await;

    emit(&event_bus, "s1", StreamEvent::TextDelta { text: "hi".to_string() }).await;
    let event = stream.next().await.expect("event was published");
    let decoded: StreamEvent = serde_json::from_value(event.payload).expect("payload deserializes back into a StreamEvent");
    assert!(matches!(decoded, StreamEvent::TextDelta { text } if text == "hi"));
}
