use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_protocol::Step;

use super::*;

fn text_message(role: MessageRole, text: &str) -> Message {
    let mut step = Step::new(0);
    step.parts.push(Part::Text { content: text.to_string(), status: PartStatus::Completed });
    Message {
        id: "m1".to_string(),
        session_id: "s1".to_string(),
        role,
        steps: vec![step],
        created_at: 0,
        status: MessageStatus::Completed,
        usage: None,
        finish_reason: None,
        metadata: None,
        todo_snapshot: None,
    }
}

#[test]
fn serializes_user_and_assistant_turns_in_order() {
    let messages = vec![text_message(MessageRole::User, "hello"), text_message(MessageRole::Assistant, "hi there")];
    let transcript = serialize_transcript(&messages);
    assert_eq!(transcript, "User: hello\nAssistant: hi there");
}

#[test]
fn renders_tool_calls_with_their_outcome() {
    let mut step = Step::new(0);
    step.parts.push(Part::Tool {
        tool_id: "t1".to_string(),
        name: "read_file".to_string(),
        input: serde_json::json!({"path": "a.rs"}),
        result: Some(serde_json::json!({"content": "ok"})),
        error: None,
        status: PartStatus::Completed,
        start_time: 0,
        duration_ms: Some(5),
    });
    let message = Message {
        id: "m2".to_string(),
        session_id: "s1".to_string(),
        role: MessageRole::Assistant,
        steps: vec![step],
        created_at: 0,
        status: MessageStatus::Completed,
        usage: None,
        finish_reason: None,
        metadata: None,
        todo_snapshot: None,
    };
    let transcript = serialize_transcript(&[message]);
    assert!(transcript.contains("[tool call: read_file"));
    assert!(transcript.contains("result:"));
}

#[test]
fn extracts_current_work_section() {
    let summary = "## Summary\nDid stuff.\n\n## Current Work\nImplementing the compaction service.\n\n## Next Steps\nWrite tests.";
    assert_eq!(extract_current_work(summary).as_deref(), Some("Implementing the compaction service."));
}

#[test]
fn no_current_work_section_returns_none() {
    let summary = "## Summary\nNothing in progress.";
    assert_eq!(extract_current_work(summary), None);
}

#[test]
fn preamble_is_prefixed_onto_the_summary() {
    let rendered = with_preamble("the summary");
    assert!(rendered.ends_with("the summary"));
    assert!(rendered.starts_with("This session was compacted"));
}
