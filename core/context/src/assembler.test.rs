use std::collections::HashMap;

use relay_protocol::CapabilitySet;
use relay_protocol::FileContent;
use relay_protocol::MessageMetadata;
use relay_protocol::MessageStatus;
use relay_protocol::ModelStatus;
use relay_protocol::PartStatus;
use relay_protocol::ProviderType;
use relay_protocol::Step;
use relay_protocol::Todo;
use relay_protocol::TodoStatus;
use relay_protocol::model::ReasoningSupport;

use super::*;

struct NoFiles;
impl FileContentSource for NoFiles {
    fn get_file_content(&self, _id: &str) -> Option<FileContent> {
        None
    }
}

struct OneFile(FileContent);
impl FileContentSource for OneFile {
    fn get_file_content(&self, id: &str) -> Option<FileContent> {
        if self.0.id == id {
            Some(self.0.clone())
        } else {
            None
        }
    }
}

fn model(input: CapabilitySet) -> ModelInfo {
    ModelInfo {
        id: "test/model".to_string(),
        provider_id: "test".to_string(),
        provider_type: ProviderType::OpenaiCompat,
        display_name: "Test Model".to_string(),
        family: "test/model".to_string(),
        speed_rank: 0,
        input_capabilities: input,
        output_capabilities: CapabilitySet::default(),
        max_context: 100_000,
        pricing: None,
        reasoning: ReasoningSupport::No,
        supported_efforts: Vec::new(),
        status: ModelStatus::Active,
        options: HashMap::new(),
    }
}

fn text_only_model() -> ModelInfo {
    model(CapabilitySet {
        text: true,
        ..Default::default()
    })
}

fn message(role: MessageRole, status: MessageStatus, steps: Vec<Step>) -> Message {
    Message {
        id: "msg_1".to_string(),
        session_id: "sess_1".to_string(),
        role,
        steps,
        created_at: 1_700_000_000_000,
        status,
        usage: None,
        finish_reason: None,
        metadata: None,
        todo_snapshot: None,
    }
}

#[test]
fn plain_text_message_round_trips() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::Text {
            content: "hello".to_string(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].role, MessageRole::User);
    assert_eq!(out[0].content, vec![ContentPart::text("hello")]);
}

#[test]
fn system_role_message_is_lifted_to_user() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::Text {
            content: "advisory".to_string(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::System, MessageStatus::Completed, vec![step]);
    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap();
    assert_eq!(out[0].role, MessageRole::User);
}

#[test]
fn aborted_message_gets_trailing_marker() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::Text {
            content: "partial".to_string(),
            status: PartStatus::Active,
        }],
        usage: None,
        duration_ms: None,
    };
    let mut msg = message(MessageRole::Assistant, MessageStatus::Active, vec![step]);
    msg.status = MessageStatus::Abort;
    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap();
    assert_eq!(
        out[0].content.last(),
        Some(&ContentPart::text("[This response was aborted by the user]"))
    );
}

#[test]
fn system_status_and_todo_blocks_prepend_user_message() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::Text {
            content: "go".to_string(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let mut msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    msg.metadata = Some(MessageMetadata {
        resource_snapshot: Some(relay_protocol::ResourceSnapshot {
            cpu_percent: 0.1,
            memory_percent: 0.2,
        }),
    });
    msg.todo_snapshot = Some(vec![Todo {
        id: 1,
        content: "write tests".to_string(),
        active_form: "writing tests".to_string(),
        status: TodoStatus::InProgress,
        ordering: 0,
    }]);

    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap();
    assert_eq!(out[0].content.len(), 3);
    let ContentPart::Text { text } = &out[0].content[0] else {
        panic!("expected text part");
    };
    assert!(text.contains("system-status"));
    let ContentPart::Text { text } = &out[0].content[1] else {
        panic!("expected text part");
    };
    assert!(text.contains("write tests"));
}

#[test]
fn tool_part_emits_call_and_result() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::Tool {
            tool_id: "call_1".to_string(),
            name: "read_file".to_string(),
            input: serde_json::json!({"path": "a.rs"}),
            result: Some(serde_json::json!({"content": "fn main() {}"})),
            error: None,
            status: PartStatus::Completed,
            start_time: 0,
            duration_ms: Some(12),
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::Assistant, MessageStatus::Completed, vec![step]);
    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap();
    assert_eq!(out[0].content.len(), 2);
    assert!(matches!(out[0].content[0], ContentPart::ToolCall { .. }));
    assert!(matches!(out[0].content[1], ContentPart::ToolResult { .. }));
}

#[test]
fn textual_file_ref_wraps_as_xml_when_model_lacks_file_input() {
    let file = FileContent::new("file_1", b"fn main() {}".to_vec(), "text/x-rust");
    let step = Step {
        step_index: 0,
        parts: vec![Part::FileRef {
            relative_path: "src/main.rs".to_string(),
            size: file.size,
            media_type: file.media_type.clone(),
            file_content_id: file.id.clone(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    let out =
        ContextAssembler::assemble(&[msg], &text_only_model(), &OneFile(file.clone())).unwrap();
    let ContentPart::Text { text } = &out[0].content[0] else {
        panic!("expected text part");
    };
    assert!(text.starts_with("<file path=\"src/main.rs\">"));
    assert!(text.contains("fn main()"));
}

#[test]
fn binary_file_ref_falls_back_to_placeholder() {
    let file = FileContent::new("file_2", vec![0u8, 1, 2, 3], "application/octet-stream");
    let step = Step {
        step_index: 0,
        parts: vec![Part::FileRef {
            relative_path: "bin/tool".to_string(),
            size: file.size,
            media_type: file.media_type.clone(),
            file_content_id: file.id.clone(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    let out = ContextAssembler::assemble(&[msg], &text_only_model(), &OneFile(file)).unwrap();
    let ContentPart::Text { text } = &out[0].content[0] else {
        panic!("expected text part");
    };
    assert!(text.contains("[Binary file content not shown]"));
}

#[test]
fn file_input_capable_model_gets_native_file_part() {
    let file = FileContent::new("file_3", b"{}".to_vec(), "application/json");
    let step = Step {
        step_index: 0,
        parts: vec![Part::FileRef {
            relative_path: "data.json".to_string(),
            size: file.size,
            media_type: file.media_type.clone(),
            file_content_id: file.id.clone(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    let capable_model = model(CapabilitySet {
        text: true,
        file: true,
        ..Default::default()
    });
    let out = ContextAssembler::assemble(&[msg], &capable_model, &OneFile(file)).unwrap();
    assert!(matches!(out[0].content[0], ContentPart::File { .. }));
}

#[test]
fn missing_file_ref_is_an_error() {
    let step = Step {
        step_index: 0,
        parts: vec![Part::FileRef {
            relative_path: "gone.txt".to_string(),
            size: 0,
            media_type: "text/plain".to_string(),
            file_content_id: "missing".to_string(),
            status: PartStatus::Completed,
        }],
        usage: None,
        duration_ms: None,
    };
    let msg = message(MessageRole::User, MessageStatus::Completed, vec![step]);
    let err = ContextAssembler::assemble(&[msg], &text_only_model(), &NoFiles).unwrap_err();
    assert!(matches!(err, crate::error::ContextError::FileContentMissing { .. }));
}
