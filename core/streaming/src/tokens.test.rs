use std::collections::HashMap;

use relay_context::ContextCalculator;
use relay_protocol::FileContent;
use relay_protocol::Message;
use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_protocol::Step;

use super::*;

fn message_with(parts: Vec<Part>) -> Message {
    let mut step = Step::new(0);
    step.parts = parts;
    Message {
        id: "m1".to_string(),
        session_id: "s1".to_string(),
        role: MessageRole::Assistant,
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
fn counts_text_parts() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::Text { content: "a".repeat(40), status: PartStatus::Completed }]);
    assert_eq!(message_tokens(&calculator, &message, &HashMap::new()), 10);
}

#[test]
fn binary_file_parts_count_as_zero() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::File {
        relative_path: "x.png".to_string(),
        size: 4,
        media_type: "image/png".to_string(),
        base64: "AAAA".to_string(),
        status: PartStatus::Completed,
    }]);
    assert_eq!(message_tokens(&calculator, &message, &HashMap::new()), 0);
}

#[test]
fn textual_file_parts_count_decoded_content() {
    use base64::Engine;
    let calculator = ContextCalculator::default();
    let encoded = base64::engine::general_purpose::STANDARD.encode("x".repeat(40));
    let message = message_with(vec![Part::File {
        relative_path: "x.txt".to_string(),
        size: 40,
        media_type: "text/plain".to_string(),
        base64: encoded,
        status: PartStatus::Completed,
    }]);
    assert_eq!(message_tokens(&calculator, &message, &HashMap::new()), 10);
}

#[test]
fn file_ref_parts_count_as_zero_when_content_not_loaded() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::FileRef {
        relative_path: "x.txt".to_string(),
        size: 40,
        media_type: "text/plain".to_string(),
        file_content_id: "f1".to_string(),
        status: PartStatus::Completed,
    }]);
    assert_eq!(message_tokens(&calculator, &message, &HashMap::new()), 0);
}

#[test]
fn file_ref_parts_count_loaded_textual_content() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::FileRef {
        relative_path: "x.txt".to_string(),
        size: 40,
        media_type: "text/plain".to_string(),
        file_content_id: "f1".to_string(),
        status: PartStatus::Completed,
    }]);
    let mut files = HashMap::new();
    files.insert("f1".to_string(), FileContent::new("f1", "x".repeat(40).into_bytes(), "text/plain"));
    assert_eq!(message_tokens(&calculator, &message, &files), 10);
}

#[test]
fn file_ref_parts_count_as_zero_when_binary() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::FileRef {
        relative_path: "x.png".to_string(),
        size: 4,
        media_type: "image/png".to_string(),
        file_content_id: "f2".to_string(),
        status: PartStatus::Completed,
    }]);
    let mut files = HashMap::new();
    files.insert("f2".to_string(), FileContent::new("f2", vec![0u8, 1, 2, 3], "image/png"));
    assert_eq!(message_tokens(&calculator, &message, &files), 0);
}

#[test]
fn total_tokens_adds_base_and_messages() {
    let calculator = ContextCalculator::default();
    let message = message_with(vec![Part::Text { content: "a".repeat(40), status: PartStatus::Completed }]);
    assert_eq!(total_tokens(&calculator, 5, std::slice::from_ref(&message), &HashMap::new()), 15);
}
