//! The provider-facing message shape produced by [`crate::assembler`]
//! (spec §4.7 "Output").

use serde::Deserialize;
use serde::Serialize;

use relay_protocol::MessageRole;

/// One piece of a [`ModelMessage`]'s content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Reasoning {
        text: String,
    },
    /// A file the target model can consume natively (its `file`/`image`
    /// input capability covers this media type).
    File {
        data: String,
        media_type: String,
        filename: String,
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
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }
}

/// One message in the ordered list handed to `Provider::open_completion`
/// (spec §4.7 Output).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMessage {
    pub role: MessageRole,
    pub content: Vec<ContentPart>,
}

impl ModelMessage {
    pub fn new(role: MessageRole, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }
}

#[cfg(test)]
#[path = "model_message.test.rs"]
mod tests;
