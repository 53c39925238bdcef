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
async fn update_replaces_the_todo_list() {
    let state = test_state();
    let session = state.session_store.create_session("p", "m", "", vec![], 0).await.unwrap();
    let router = TodoRouter::new(state);

    let params = serde_json::json!({
        "sessionId": session.id,
        "todos": [{"id": 1, "content": "write tests", "active_form": "writing tests", "status": "pending", "ordering": 0}],
        "nextTodoId": 2,
    });
    let result = router.call("update", params, &SecurityContext::anonymous()).await.expect("update should succeed");
    assert_eq!(result["todos"].as_array().unwrap().len(), 1);
    assert_eq!(result["nextTodoId"], 2);
}

#[tokio::test]
async fn unknown_procedure_is_rejected() {
    let router = TodoRouter::new(test_state());
    let err = router.call("bogus", serde_json::Value::Null, &SecurityContext::anonymous()).await.expect_err("no such procedure");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}
