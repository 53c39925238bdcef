use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use relay_event_log::InMemoryEventLog;
use serde_json::json;

use super::*;

#[tokio::test]
async fn publish_assigns_increasing_sequence_within_same_timestamp() {
    let bus = EventBus::new(None);
    let a = bus.publish("c", "t", json!({})).await;
    let b = bus.publish("c", "t", json!({})).await;
    assert!((a.timestamp, a.sequence) < (b.timestamp, b.sequence));
}

#[tokio::test]
async fn subscribe_without_cursor_replays_buffer_then_live() {
    let bus = EventBus::new(None);
    bus.publish("c", "t", json!({"n": 1})).await;

    let mut stream = bus.subscribe("c", None).await;
    let first = stream.next().await.unwrap();
    assert_eq!(first.payload, json!({"n": 1}));

    let bus = Arc::new(bus);
    let bus2 = bus.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        bus2.publish("c", "t", json!({"n": 2})).await;
    });
    let second = stream.next().await.unwrap();
    assert_eq!(second.payload, json!({"n": 2}));
}

#[tokio::test]
async fn subscribe_with_history_replays_from_log() {
    let log = Arc::new(InMemoryEventLog::new());
    let bus = EventBus::new(Some(log.clone()));
    for i in 0..5 {
        bus.publish("c", "t", json!({"n": i})).await;
    }
    // give the fire-and-forget persistence task a chance to land
    tokio::time::sleep(Duration::from_millis(20)).await;

    let mut stream = bus.subscribe_with_history("c", 3).await;
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(stream.next().await.unwrap().payload.clone());
    }
    assert_eq!(seen, vec![json!({"n": 2}), json!({"n": 3}), json!({"n": 4})]);
}

#[tokio::test]
async fn info_reports_subscriber_count() {
    let bus = EventBus::new(None);
    assert_eq!(bus.info("c").await.subscriber_count, 0);
    let _sub = bus.subscribe("c", None).await;
    assert_eq!(bus.info("c").await.subscriber_count, 1);
}

#[tokio::test]
async fn cleanup_drops_channels_with_no_subscribers() {
    let bus = EventBus::new(None);
    bus.publish("c", "t", json!({})).await;
    bus.cleanup().await;
    assert_eq!(bus.info("c").await.buffered_count, 0);
}

#[tokio::test]
async fn destroy_removes_channel_unconditionally() {
    let bus = EventBus::new(None);
    let _sub = bus.subscribe("c", None).await;
    bus.destroy("c").await;
    assert_eq!(bus.info("c").await.subscriber_count, 0);
}
