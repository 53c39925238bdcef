//! Message, Step, and Part — spec §3.

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A message's lifecycle state. Transitions are monotone:
/// `active -> {completed, error, abort}`, never back (spec §3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Active,
    Completed,
    Error,
    Abort,
}

impl MessageStatus {
    /// Whether transitioning from `self` to `next` is a legal move under
    /// the monotone state machine.
    pub fn can_transition_to(self, next: MessageStatus) -> bool {
        match self {
            MessageStatus::Active => !matches!(next, MessageStatus::Active),
            _ => false,
        }
    }
}

/// Token accounting for a completed (or in-flight) message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl Usage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A snapshot of process resource usage, attached to user message metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_snapshot: Option<ResourceSnapshot>,
}

/// A message within a session: an ordered sequence of [`Step`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub steps: Vec<Step>,
    pub created_at: i64,
    pub status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_snapshot: Option<Vec<crate::Todo>>,
}

impl Message {
    /// Attempts the `status -> next` transition, returning `false` (and
    /// leaving `self` untouched) if it would violate monotonicity.
    #[must_use]
    pub fn try_transition_status(&mut self, next: MessageStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        true
    }

    /// Index the next step must use to append in order (spec §4.3: step
    /// indices must be strictly increasing on append).
    pub fn next_step_index(&self) -> u32 {
        self.steps.len() as u32
    }
}

/// A part's own lifecycle, independent of the owning message's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    Active,
    Completed,
    Error,
}

/// One ordered group of parts within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_index: u32,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Step {
    pub fn new(step_index: u32) -> Self {
        Self {
            step_index,
            parts: Vec::new(),
            usage: None,
            duration_ms: None,
        }
    }
}

/// One tagged piece of a step's content (spec §3 Part variants).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        content: String,
        status: PartStatus,
    },
    Reasoning {
        content: String,
        status: PartStatus,
        start_time: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_time: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Tool {
        tool_id: String,
        name: String,
        input: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        status: PartStatus,
        start_time: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    File {
        relative_path: String,
        size: u64,
        media_type: String,
        base64: String,
        status: PartStatus,
    },
    FileRef {
        relative_path: String,
        size: u64,
        media_type: String,
        file_content_id: String,
        status: PartStatus,
    },
    Error {
        error: String,
        status: PartStatus,
    },
    SystemMessage {
        content: String,
        message_type: String,
        timestamp: i64,
        status: PartStatus,
    },
}

#[cfg(test)]
#[path = "message.test.rs"]
mod tests;
