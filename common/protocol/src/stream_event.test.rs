use super::*;

#[test]
fn tool_call_serializes_with_kebab_type_and_camel_fields() {
    let event = StreamEvent::ToolCall {
        tool_call_id: "call_1".to_string(),
        tool_name: "read_file".to_string(),
        input: serde_json::json!({"path": "foo.rs"}),
    };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["type"], "tool-call");
    assert_eq!(json["toolCallId"], "call_1");
    assert_eq!(json["toolName"], "read_file");
}

#[test]
fn step_start_round_trips() {
    let event = StreamEvent::StepStart {
        step_id: "step_1".to_string(),
        step_index: 0,
        metadata: serde_json::json!({}),
        todo_snapshot: vec![],
        system_messages: None,
    };
    let json = serde_json::to_value(&event).expect("serialize");
    assert_eq!(json["type"], "step-start");
    assert_eq!(json["stepIndex"], 0);
    let parsed: StreamEvent = serde_json::from_value(json).expect("deserialize");
    assert!(matches!(parsed, StreamEvent::StepStart { step_index: 0, .. }));
}

#[test]
fn terminal_variants_report_is_terminal() {
    assert!(StreamEvent::Complete { usage: None, finish_reason: None }.is_terminal());
    assert!(StreamEvent::Error { error: "boom".to_string() }.is_terminal());
    assert!(StreamEvent::Abort.is_terminal());
    assert!(!StreamEvent::TextStart.is_terminal());
}

#[test]
fn abort_has_no_extra_fields() {
    let json = serde_json::to_value(StreamEvent::Abort).expect("serialize");
    assert_eq!(json, serde_json::json!({"type": "abort"}));
}
