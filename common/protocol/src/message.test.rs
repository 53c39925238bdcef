use super::*;

#[test]
fn status_transitions_are_monotone() {
    assert!(MessageStatus::Active.can_transition_to(MessageStatus::Completed));
    assert!(MessageStatus::Active.can_transition_to(MessageStatus::Error));
    assert!(MessageStatus::Active.can_transition_to(MessageStatus::Abort));
    assert!(!MessageStatus::Active.can_transition_to(MessageStatus::Active));
    assert!(!MessageStatus::Completed.can_transition_to(MessageStatus::Active));
    assert!(!MessageStatus::Error.can_transition_to(MessageStatus::Completed));
}

fn sample_message() -> Message {
    Message {
        id: "msg_1".to_string(),
        session_id: "sess_1".to_string(),
        role: MessageRole::Assistant,
        steps: Vec::new(),
        created_at: 0,
        status: MessageStatus::Active,
        usage: None,
        finish_reason: None,
        metadata: None,
        todo_snapshot: None,
    }
}

#[test]
fn try_transition_status_rejects_illegal_moves() {
    let mut message = sample_message();
    assert!(message.try_transition_status(MessageStatus::Completed));
    assert_eq!(message.status, MessageStatus::Completed);

    assert!(!message.try_transition_status(MessageStatus::Active));
    assert_eq!(message.status, MessageStatus::Completed);
}

#[test]
fn next_step_index_tracks_step_count() {
    let mut message = sample_message();
    assert_eq!(message.next_step_index(), 0);
    message.steps.push(Step::new(0));
    assert_eq!(message.next_step_index(), 1);
}

#[test]
fn usage_total_sums_both_counts() {
    let usage = Usage {
        prompt_tokens: 100,
        completion_tokens: 42,
    };
    assert_eq!(usage.total(), 142);
}

#[test]
fn part_tool_serde_round_trip() {
    let part = Part::Tool {
        tool_id: "call_1".to_string(),
        name: "read_file".to_string(),
        input: serde_json::json!({"path": "foo.rs"}),
        result: Some(serde_json::json!({"content": "..."})),
        error: None,
        status: PartStatus::Completed,
        start_time: 10,
        duration_ms: Some(5),
    };
    let json = serde_json::to_value(&part).expect("serialize");
    assert_eq!(json["type"], "tool");
    let parsed: Part = serde_json::from_value(json).expect("deserialize");
    match parsed {
        Part::Tool { name, status, .. } => {
            assert_eq!(name, "read_file");
            assert_eq!(status, PartStatus::Completed);
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn part_text_serde_round_trip() {
    let part = Part::Text {
        content: "hello".to_string(),
        status: PartStatus::Active,
    };
    let json = serde_json::to_value(&part).expect("serialize");
    assert_eq!(json["type"], "text");
    assert_eq!(json["content"], "hello");
}
