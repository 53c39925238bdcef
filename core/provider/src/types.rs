//! Wire-independent types shared by every [`crate::adapter::Provider`]
//! implementation (spec §4.5).

use serde::Deserialize;
use serde::Serialize;

/// One field of a provider's configuration schema (spec §4.5
/// `getConfigSchema`), used by the RPC layer to render a setup form without
/// the core knowing anything about concrete provider wire formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    pub key: String,
    pub label: String,
    pub required: bool,
    #[serde(default)]
    pub secret: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ConfigField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, required: bool) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required,
            secret: false,
            default: None,
        }
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }
}

/// Model details fetched live from a provider (spec §4.5 `getModelDetails`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
    pub context_length: u32,
    pub max_output: u32,
    pub input_price_per_million: f64,
    pub output_price_per_million: f64,
}

/// Per-request options threaded into `open_completion`, independent of the
/// tool/prompt content itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<relay_protocol::ReasoningEffort>,
}

/// One schema a tool may be called with, as presented to the provider
/// (spec §4.7: "JSON serialization of all enabled tool schemas" feeds
/// `baseContextTokens`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// The tagged union a provider stream yields (spec §4.5
/// `ProviderStreamEvent`). One-to-one with the `StreamEvent` content/tool
/// variants the Streaming Engine translates these into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProviderStreamEvent {
    TextStart,
    TextDelta { text: String },
    TextEnd,
    ReasoningStart,
    ReasoningDelta { text: String },
    ReasoningEnd,
    ToolInputStart { tool_call_id: String, tool_name: String },
    ToolInputDelta { tool_call_id: String, input_text_delta: String },
    ToolInputEnd { tool_call_id: String },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        input: serde_json::Value,
    },
    File { media_type: String, base64: String },
    Finish {
        usage: relay_protocol::Usage,
        finish_reason: String,
    },
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;
