use super::*;

fn test_env() -> EnvironmentInfo {
    EnvironmentInfo::builder()
        .cwd("/tmp/test")
        .model("test-model")
        .context_window(200000)
        .max_output_tokens(16384)
        .build()
        .unwrap()
}

#[test]
fn test_builder_minimal() {
    let ctx = ConversationContext::builder()
        .environment(test_env())
        .build()
        .unwrap();

    assert_eq!(ctx.environment.model, "test-model");
    assert!(!ctx.has_tools());
    assert!(!ctx.has_mcp_servers());
}

#[test]
fn test_builder_full() {
    let ctx = ConversationContext::builder()
        .environment(test_env())
        .tool_names(vec!["read_file".to_string(), "write_file".to_string()])
        .mcp_server_names(vec!["github".to_string()])
        .memory_files(vec![MemoryFile {
            path: "AGENTS.md".to_string(),
            content: "instructions".to_string(),
            priority: 0,
        }])
        .injections(vec![ContextInjection {
            label: "todo".to_string(),
            content: "- [ ] write tests".to_string(),
            position: InjectionPosition::EndOfPrompt,
        }])
        .build()
        .unwrap();

    assert!(ctx.has_tools());
    assert!(ctx.has_mcp_servers());
    assert_eq!(ctx.memory_files.len(), 1);
    assert_eq!(ctx.injections.len(), 1);
}

#[test]
fn test_builder_missing_environment() {
    let result = ConversationContext::builder().build();
    assert!(result.is_err());
}

#[test]
fn test_injection_position_serde() {
    let json = r#""before_tools""#;
    let pos: InjectionPosition = serde_json::from_str(json).unwrap();
    assert_eq!(pos, InjectionPosition::BeforeTools);
}
