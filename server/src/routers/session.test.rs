use std::sync::Arc;

use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_model_registry::ProviderEntry;
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
async fn create_then_get_round_trips() {
    let router = SessionRouter::new(test_state());
    let ctx = SecurityContext::with_caller("tester");

    let created = router
        .call("create", serde_json::json!({"provider": "passthrough", "model": "passthrough"}), &ctx)
        .await
        .expect("create should succeed");
    let session_id = created.get("id").and_then(|v| v.as_str()).expect("id present").to_string();

    let fetched = router.call("getById", serde_json::json!({"sessionId": session_id}), &ctx).await.expect("getById should succeed");
    assert_eq!(fetched["session"]["id"], session_id);
    assert_eq!(fetched["messages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn get_by_id_returns_null_for_unknown_session() {
    let router = SessionRouter::new(test_state());
    let result = router.call("getById", serde_json::json!({"sessionId": "does-not-exist"}), &SecurityContext::anonymous()).await.unwrap();
    assert_eq!(result, serde_json::Value::Null);
}

#[tokio::test]
async fn update_title_then_delete() {
    let router = SessionRouter::new(test_state());
    let ctx = SecurityContext::with_caller("tester");
    let created = router.call("create", serde_json::json!({"provider": "passthrough", "model": "passthrough"}), &ctx).await.unwrap();
    let session_id = created["id"].as_str().unwrap().to_string();

    let updated = router.call("updateTitle", serde_json::json!({"sessionId": session_id, "title": "Hello"}), &ctx).await.unwrap();
    assert_eq!(updated["title"], "Hello");

    router.call("delete", serde_json::json!({"sessionId": session_id}), &ctx).await.unwrap();
    let result = router.call("getById", serde_json::json!({"sessionId": session_id}), &ctx).await.unwrap();
    assert_eq!(result, serde_json::Value::Null);
}

#[tokio::test]
async fn unknown_procedure_is_rejected() {
    let router = SessionRouter::new(test_state());
    let err = router.call("bogus", serde_json::Value::Null, &SecurityContext::anonymous()).await.expect_err("no such procedure");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}
