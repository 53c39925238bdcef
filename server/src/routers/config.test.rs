use std::sync::Arc;

use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_model_registry::ProviderEntry;
use relay_provider::PassthroughProvider;
use relay_provider::ProviderRegistry;
use relay_session_store::NullPersistence;
use relay_session_store::SessionStore;
use relay_tools::ToolRegistry;
use relay_triggers::TriggerLayer;
use tokio::sync::RwLock;

use super::*;
use crate::security::SecurityContext;

fn test_state(config_dir: std::path::PathBuf) -> AppState {
    let session_store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let model_registry = Arc::new(ModelRegistry::new(
        vec![ProviderEntry { id: "passthrough".to_string(), name: "Passthrough".to_string(), provider_type: relay_protocol::ProviderType::OpenaiCompat }],
        vec![],
    ));
    let provider_registry = Arc::new(ProviderRegistry::new());
    provider_registry.register(Arc::new(PassthroughProvider));
    let tool_registry = Arc::new(ToolRegistry::new());
    let trigger_layer = Arc::new(TriggerLayer::new());
    let config = Arc::new(RwLock::new(relay_config::AiConfig::default()));
    AppState::new(session_store, event_bus, model_registry, provider_registry, tool_registry, trigger_layer, config, config_dir)
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let router = ConfigRouter::new(test_state(dir.path().to_path_buf()));
    let ctx = SecurityContext::with_caller("tester");

    let save_params = serde_json::json!({
        "providers": {"passthrough": {"api_key": "sk-test"}},
        "default_provider": "passthrough",
    });
    router.call("save", save_params, &ctx).await.expect("save should succeed");

    let loaded = router.call("load", serde_json::Value::Null, &ctx).await.expect("load should succeed");
    assert_eq!(loaded["default_provider"], "passthrough");
    assert_eq!(loaded["providers"]["passthrough"]["api_key"], "sk-test");
}

#[tokio::test]
async fn get_provider_schema_returns_configured_fields() {
    let dir = tempfile::tempdir().unwrap();
    let router = ConfigRouter::new(test_state(dir.path().to_path_buf()));
    let result = router.call("getProviderSchema", serde_json::json!({"providerId": "passthrough"}), &SecurityContext::anonymous()).await.expect("schema should resolve");
    assert!(result.is_array());
}

#[tokio::test]
async fn count_file_tokens_estimates_from_text() {
    let dir = tempfile::tempdir().unwrap();
    let router = ConfigRouter::new(test_state(dir.path().to_path_buf()));
    let result = router.call("countFileTokens", serde_json::json!({"text": "hello world"}), &SecurityContext::anonymous()).await.unwrap();
    assert!(result["tokens"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn update_rules_persists_default_enabled_rule_ids() {
    let dir = tempfile::tempdir().unwrap();
    let router = ConfigRouter::new(test_state(dir.path().to_path_buf()));
    let ctx = SecurityContext::with_caller("tester");
    let result = router.call("updateRules", serde_json::json!({"enabledRuleIds": ["rule-a"]}), &ctx).await.expect("updateRules should succeed");
    assert_eq!(result["default_enabled_rule_ids"], serde_json::json!(["rule-a"]));
}

#[tokio::test]
async fn unknown_procedure_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = ConfigRouter::new(test_state(dir.path().to_path_buf()));
    let err = router.call("bogus", serde_json::Value::Null, &SecurityContext::anonymous()).await.expect_err("no such procedure");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}
