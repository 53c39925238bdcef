use std::sync::Arc;

use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_model_registry::ProviderEntry;
use relay_provider::PASSTHROUGH_MODEL_ID;
use relay_provider::PassthroughProvider;
use relay_provider::ProviderRegistry;
use relay_provider::passthrough_model;
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
    let model_registry = Arc::new(ModelRegistry::new(
        vec![ProviderEntry { id: "passthrough".to_string(), name: "Passthrough".to_string(), provider_type: relay_protocol::ProviderType::OpenaiCompat }],
        vec![passthrough_model()],
    ));
    let provider_registry = Arc::new(ProviderRegistry::new());
    provider_registry.register(Arc::new(PassthroughProvider));
    let tool_registry = Arc::new(ToolRegistry::new());
    let trigger_layer = Arc::new(TriggerLayer::new());
    let config = Arc::new(RwLock::new(relay_config::AiConfig::default()));
    AppState::new(session_store, event_bus, model_registry, provider_registry, tool_registry, trigger_layer, config, std::env::temp_dir().join("relay-server-test"))
}

#[tokio::test]
async fn trigger_stream_then_subscribe_sees_complete() {
    let router = MessageRouter::new(test_state());
    let ctx = SecurityContext::with_caller("tester");

    let params = serde_json::json!({
        "provider": "passthrough",
        "model": PASSTHROUGH_MODEL_ID,
        "content": [{"type": "text", "content": "hi", "status": "completed"}],
    });
    let result = router.call("triggerStream", params, &ctx).await.expect("trigger should succeed");
    let session_id = result["sessionId"].as_str().unwrap().to_string();

    let mut stream = router.subscribe("subscribe", serde_json::json!({"sessionId": session_id}), &ctx).await.expect("subscribe should succeed");
    let mut saw_complete = false;
    while let Some(event) = futures::StreamExt::next(&mut stream).await {
        if event["data"]["type"] == "complete" {
            saw_complete = true;
            break;
        }
    }
    assert!(saw_complete);
}

#[tokio::test]
async fn unknown_procedure_is_rejected() {
    let router = MessageRouter::new(test_state());
    let err = router.call("bogus", serde_json::Value::Null, &SecurityContext::anonymous()).await.expect_err("no such procedure");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}
