use super::*;

fn sample() -> ToolInfo {
    ToolInfo {
        id: "read_file".to_string(),
        name: "read_file".to_string(),
        category: ToolCategory::FileSystem,
        description: "Reads a file".to_string(),
        input_schema: serde_json::json!({"type": "object"}),
        security_level: SecurityLevel::ReadOnly,
        supports_parallel: true,
        enabled_by_default: true,
        source: ToolSource::Builtin,
        supported_by_models: vec![],
        unsupported_by_models: vec![],
    }
}

#[test]
fn compatible_with_model_defaults_to_allow_all() {
    let tool = sample();
    assert!(tool.compatible_with_model("anthropic/claude-opus-4"));
}

#[test]
fn deny_list_overrides_allow_list() {
    let mut tool = sample();
    tool.supported_by_models = vec!["anthropic/claude-opus-4".to_string()];
    tool.unsupported_by_models = vec!["anthropic/claude-opus-4".to_string()];
    assert!(!tool.compatible_with_model("anthropic/claude-opus-4"));
}

#[test]
fn allow_list_restricts_to_named_models() {
    let mut tool = sample();
    tool.supported_by_models = vec!["anthropic/claude-opus-4".to_string()];
    assert!(tool.compatible_with_model("anthropic/claude-opus-4"));
    assert!(!tool.compatible_with_model("openai/gpt-5"));
}

#[test]
fn execution_result_helpers() {
    let failure = ToolExecutionResult::failure("bad args");
    assert!(!failure.success);
    assert_eq!(failure.duration_ms, 0);

    let success = ToolExecutionResult::success(serde_json::json!({"ok": true}), 12);
    assert!(success.success);
    assert_eq!(success.duration_ms, 12);
}

#[test]
fn security_level_orders_by_trust() {
    assert!(SecurityLevel::ReadOnly < SecurityLevel::Write);
    assert!(SecurityLevel::Write < SecurityLevel::Execute);
}
