//! Token accounting (spec §4.8.2).
//!
//! A model-specific tokenizer is out of scope for this core (concrete
//! provider SDKs are a Non-goal); [`relay_context::ContextCalculator`]'s
//! chars-per-token estimator stands in for it, as it already does for the
//! Context Assembler's budget accounting.

use std::collections::HashMap;

use base64::Engine;
use relay_context::ContextCalculator;
use relay_protocol::FileContent;
use relay_protocol::Message;
use relay_protocol::Part;
use relay_provider::ToolSchema;

const TEXTUAL_MEDIA_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-yaml",
    "application/yaml",
];

fn is_textual(media_type: &str) -> bool {
    media_type.starts_with("text/") || TEXTUAL_MEDIA_TYPES.contains(&media_type)
}

fn textual_file_tokens(calculator: &ContextCalculator, base64_content: &str) -> u64 {
    let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(base64_content) else {
        return 0;
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return 0;
    };
    calculator.estimate_tokens(&text) as u64
}

/// Token count of one part, "by convention zero for binary content" (spec
/// §4.8.2). `files` resolves out-of-line file content (`Part::FileRef`) for
/// messages whose referenced files the caller has already loaded; a
/// `FileRef` whose id isn't in the map (content pruned, lookup failed)
/// counts as zero, same as a binary file.
fn part_tokens(calculator: &ContextCalculator, part: &Part, files: &HashMap<String, FileContent>) -> u64 {
    match part {
        Part::Text { content, .. } => calculator.estimate_tokens(content) as u64,
        Part::Reasoning { content, .. } => calculator.estimate_tokens(content) as u64,
        Part::Tool { input, result, .. } => {
            let mut tokens = calculator.estimate_tokens(&input.to_string()) as u64;
            if let Some(result) = result {
                tokens += calculator.estimate_tokens(&result.to_string()) as u64;
            }
            tokens
        }
        Part::File { media_type, base64, .. } => {
            if is_textual(media_type) {
                textual_file_tokens(calculator, base64)
            } else {
                0
            }
        }
        Part::FileRef { file_content_id, media_type, .. } => match files.get(file_content_id) {
            Some(content) if is_textual(media_type) => match std::str::from_utf8(&content.content) {
                Ok(text) => calculator.estimate_tokens(text) as u64,
                Err(_) => 0,
            },
            _ => 0,
        },
        Part::Error { error, .. } => calculator.estimate_tokens(error) as u64,
        Part::SystemMessage { content, .. } => calculator.estimate_tokens(content) as u64,
    }
}

pub fn message_tokens(calculator: &ContextCalculator, message: &Message, files: &HashMap<String, FileContent>) -> u64 {
    message.steps.iter().flat_map(|step| step.parts.iter()).map(|part| part_tokens(calculator, part, files)).sum()
}

/// `baseContextTokens`: the system prompt plus the JSON serialization of
/// every enabled tool schema, computed once at session creation (spec
/// §4.8.2).
pub fn base_context_tokens(calculator: &ContextCalculator, system_prompt: &str, tool_schemas: &[ToolSchema]) -> u64 {
    let mut tokens = calculator.estimate_tokens(system_prompt) as u64;
    for schema in tool_schemas {
        let serialized = serde_json::to_string(schema).unwrap_or_default();
        tokens += calculator.estimate_tokens(&serialized) as u64;
    }
    tokens
}

/// `totalTokens = baseContextTokens + Σ message token counts` (spec §4.8.2).
/// `files` should hold every file a `Part::FileRef` among `messages` points
/// to, resolved up front by the caller since this estimator is synchronous.
pub fn total_tokens(calculator: &ContextCalculator, base_context_tokens: u64, messages: &[Message], files: &HashMap<String, FileContent>) -> u64 {
    base_context_tokens + messages.iter().map(|message| message_tokens(calculator, message, files)).sum::<u64>()
}

#[cfg(test)]
#[path = "tokens.test.rs"]
mod tests;
