use super::*;

#[test]
fn default_config_has_no_providers() {
    let config = AiConfig::default();
    assert!(config.providers.is_empty());
    assert_eq!(config.default_provider, None);
}

#[test]
fn provider_looks_up_by_id() {
    let mut config = AiConfig::default();
    config.providers.insert(
        "anthropic".to_string(),
        ProviderConfig {
            api_key: Some("sk-test".to_string()),
            base_url: None,
            default_model: Some("claude-opus-4".to_string()),
        },
    );
    assert_eq!(
        config.provider("anthropic").and_then(|p| p.default_model.as_deref()),
        Some("claude-opus-4")
    );
    assert!(config.provider("openai").is_none());
}

#[test]
fn serde_round_trip_skips_absent_optionals() {
    let config = AiConfig {
        default_provider: Some("anthropic".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_value(&config).expect("serialize");
    assert!(json.get("default_model").is_none());
    assert_eq!(json["default_provider"], "anthropic");
}
