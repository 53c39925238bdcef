//! The client-facing stream protocol emitted by the streaming engine
//! (spec §4.8). Each variant carries exactly the fields a client needs to
//! reconstruct UI state; additional fields are forbidden in the stable
//! protocol.

use serde::Deserialize;
use serde::Serialize;

use crate::message::Usage;
use crate::session::Todo;

/// One event in a session's stream. Tagged by `type` using the variant's
/// `snake_case` name (e.g. `session-created` serializes as `"type":
/// "session-created"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum StreamEvent {
    // -- Lifecycle --
    SessionCreated {
        session_id: String,
        provider: String,
        model: String,
    },
    SessionDeleted {
        session_id: String,
    },
    SessionModelUpdated {
        session_id: String,
        model: String,
    },
    SessionProviderUpdated {
        session_id: String,
        provider: String,
    },
    SessionTitleUpdatedStart,
    SessionTitleUpdatedDelta {
        text: String,
    },
    SessionTitleUpdatedEnd {
        title: String,
    },
    SessionTitleUpdated {
        title: String,
    },
    SessionTokensUpdated {
        base_context_tokens: u64,
        total_tokens: u64,
    },
    SessionCompacted {
        old_session_id: String,
        new_session_id: String,
        summary: String,
        message_count: usize,
    },

    // -- Messages --
    UserMessageCreated {
        message_id: String,
        content: serde_json::Value,
    },
    AssistantMessageCreated {
        message_id: String,
    },
    SystemMessageCreated {
        message_id: String,
        content: String,
    },
    MessageStatusUpdated {
        message_id: String,
        status: crate::message::MessageStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },

    // -- Steps --
    StepStart {
        step_id: String,
        step_index: u32,
        metadata: serde_json::Value,
        todo_snapshot: Vec<Todo>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_messages: Option<Vec<String>>,
    },
    StepComplete {
        step_id: String,
        usage: Usage,
        duration_ms: u64,
        finish_reason: String,
    },

    // -- Content --
    TextStart,
    TextDelta {
        text: String,
    },
    TextEnd,
    ReasoningStart,
    ReasoningDelta {
        text: String,
    },
    ReasoningEnd {
        duration_ms: u64,
    },
    File {
        media_type: String,
        base64: String,
    },

    // -- Tools --
    ToolInputStart {
        tool_call_id: String,
    },
    ToolInputDelta {
        tool_call_id: String,
        input_text_delta: String,
    },
    ToolInputEnd {
        tool_call_id: String,
    },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: serde_json::Value,
        duration_ms: u64,
    },
    ToolError {
        tool_call_id: String,
        tool_name: String,
        error: String,
        duration_ms: u64,
    },

    // -- Terminal --
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<Usage>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
    Error {
        error: String,
    },
    Abort,
}

impl StreamEvent {
    /// Whether this variant is one of the three turn-terminal events. A
    /// session channel carries exactly one of these per turn (spec §4.8
    /// invariant), always preceded by a matching `MessageStatusUpdated`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete { .. } | StreamEvent::Error { .. } | StreamEvent::Abort)
    }
}

#[cfg(test)]
#[path = "stream_event.test.rs"]
mod tests;
