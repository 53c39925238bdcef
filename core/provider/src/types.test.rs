use super::*;

#[test]
fn config_field_secret_builder_sets_flag() {
    let field = ConfigField::new("api_key", "API Key", true).secret();
    assert!(field.secret);
    assert!(field.required);
}

#[test]
fn provider_stream_event_round_trips_through_json() {
    let event = ProviderStreamEvent::ToolCall {
        tool_call_id: "call_1".to_string(),
        tool_name: "read_file".to_string(),
        input: serde_json::json!({ "path": "a.rs" }),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "tool-call");
    let back: ProviderStreamEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}
