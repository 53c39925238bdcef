use super::*;
use crate::types::ProviderConfig;

#[test]
fn load_missing_file_returns_default_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = load(dir.path()).expect("load");
    assert_eq!(config, AiConfig::default());
}

#[test]
fn load_rejects_malformed_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").expect("write");
    let err = load(dir.path()).expect_err("should fail to parse");
    assert!(matches!(err, ConfigError::InvalidJson { .. }));
}

#[test]
fn load_rejects_wrong_field_type_with_field_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "default_provider": 5 }"#).expect("write");
    let err = load(dir.path()).expect_err("should fail to decode");
    let ConfigError::Parse { message, .. } = err else {
        panic!("expected a Parse error, got {err:?}");
    };
    assert!(message.starts_with("default_provider:"), "message was: {message}");
}

#[test]
fn load_accepts_jsonc_comments() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        r#"{
            // default provider
            "default_provider": "anthropic"
        }"#,
    )
    .expect("write");
    let config = load(dir.path()).expect("load");
    assert_eq!(config.default_provider.as_deref(), Some("anthropic"));
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = AiConfig {
        default_provider: Some("anthropic".to_string()),
        default_model: Some("claude-opus-4".to_string()),
        ..Default::default()
    };
    config.providers.insert(
        "anthropic".to_string(),
        ProviderConfig {
            api_key: Some("sk-test".to_string()),
            base_url: None,
            default_model: None,
        },
    );

    save(dir.path(), &config).expect("save");
    let loaded = load(dir.path()).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn save_creates_config_dir_if_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("nested");
    save(&nested, &AiConfig::default()).expect("save");
    assert!(nested.join(CONFIG_FILE).exists());
}

#[test]
fn config_dir_defaults_to_home_dot_relay_without_env_override() {
    // SAFETY: test-only, single-threaded assertion about the fallback path;
    // we don't mutate RELAY_HOME here.
    if std::env::var(RELAY_HOME_ENV).is_ok() {
        return;
    }
    let dir = config_dir();
    assert!(dir.ends_with(DEFAULT_CONFIG_DIR));
}
