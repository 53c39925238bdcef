use std::sync::Arc;

use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_provider::ProviderRegistry;
use relay_session_store::NullPersistence;
use relay_session_store::SessionStore;
use relay_tools::ToolRegistry;
use relay_triggers::TriggerLayer;
use tokio::sync::RwLock;

use super::*;
use crate::security::SecurityContext;

fn test_state() -> AppState {
    let session_store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let model_registry = Arc::new(ModelRegistry::new(vec![], vec![]));
    let provider_registry = Arc::new(ProviderRegistry::new());
    let tool_registry = Arc::new(ToolRegistry::new());
    let trigger_layer = Arc::new(TriggerLayer::new());
    let config = Arc::new(RwLock::new(relay_config::AiConfig::default()));
    AppState::new(session_store, event_bus, model_registry, provider_registry, tool_registry, trigger_layer, config, std::env::temp_dir().join("relay-server-test"))
}

#[tokio::test]
async fn subscribe_by_pattern_receives_published_events() {
    let state = test_state();
    state.event_bus.publish("session-1", "custom-event", serde_json::json!({"n": 1})).await;
    let router = EventsRouter::new(state.clone());

    let mut stream = router.subscribe("subscribe", serde_json::json!({"pattern": "session-1"}), &SecurityContext::anonymous()).await.expect("subscribe should succeed");
    let event = futures::StreamExt::next(&mut stream).await.expect("stream has a replayed event");
    assert_eq!(event["data"]["n"], 1);
}

#[tokio::test]
async fn subscribe_to_session_is_scoped_to_that_channel() {
    let state = test_state();
    state.event_bus.publish("session-a", "noise", serde_json::json!({})).await;
    state.event_bus.publish("session-b", "target", serde_json::json!({"ok": true})).await;
    let router = EventsRouter::new(state);

    let mut stream = router.subscribe("subscribeToSession", serde_json::json!({"sessionId": "session-b"}), &SecurityContext::anonymous()).await.unwrap();
    let event = futures::StreamExt::next(&mut stream).await.expect("replayed event for session-b");
    assert_eq!(event["data"]["ok"], true);
}

#[tokio::test]
async fn unknown_procedure_is_rejected() {
    let router = EventsRouter::new(test_state());
    let err = router.subscribe("bogus", serde_json::Value::Null, &SecurityContext::anonymous()).await.expect_err("no such procedure");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}
