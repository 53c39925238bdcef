//! Deterministic transcript serialization for the summarization prompt
//! (spec §4.10 step 2) and "## Current Work" detection (step 3).
//!
//! Grounded in the teacher's `core/loop::compaction`/`session_memory_agent`
//! summarization-prompt construction: a flat "User: … / Assistant: …"
//! transcript with attachment markers, plus a heuristic scan of the last
//! assistant message for in-progress work.

use relay_protocol::Message;
use relay_protocol::MessageRole;
use relay_protocol::Part;

const PREAMBLE: &str = "This session was compacted from a longer conversation. \
The following is a summary of everything discussed and done so far; continue from here.\n\n";

/// Renders `messages` into a flat, deterministic transcript the
/// summarization provider consumes as a one-shot user prompt.
pub fn serialize_transcript(messages: &[Message]) -> String {
    let mut lines = Vec::new();
    for message in messages {
        let speaker = match message.role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::System => "System",
        };
        for step in &message.steps {
            for part in &step.parts {
                if let Some(rendered) = render_part(part) {
                    lines.push(format!("{speaker}: {rendered}"));
                }
            }
        }
    }
    lines.join("\n")
}

fn render_part(part: &Part) -> Option<String> {
    match part {
        Part::Text { content, .. } => Some(content.clone()),
        Part::Reasoning { content, .. } => Some(format!("(reasoning) {content}")),
        Part::Tool { name, input, result, error, .. } => {
            let outcome = match (result, error) {
                (_, Some(err)) => format!("error: {err}"),
                (Some(res), None) => format!("result: {res}"),
                (None, None) => "pending".to_string(),
            };
            Some(format!("[tool call: {name}({input}) -> {outcome}]"))
        }
        Part::File { relative_path, media_type, .. } | Part::FileRef { relative_path, media_type, .. } => {
            Some(format!("[attachment: {relative_path} ({media_type})]"))
        }
        Part::Error { error, .. } => Some(format!("[error: {error}]")),
        Part::SystemMessage { content, .. } => Some(format!("(system) {content}")),
    }
}

/// Prefixes the preamble onto the summary before inserting it as the new
/// session's first user message (spec §4.10 step 5).
pub fn with_preamble(summary: &str) -> String {
    format!("{PREAMBLE}{summary}")
}

/// Scans `summary` for a `## Current Work` section, returning its body if
/// present — used to decide whether to surface in-progress work when the
/// implicit follow-up turn (step 8) is triggered.
pub fn extract_current_work(summary: &str) -> Option<String> {
    let marker = "## Current Work";
    let start = summary.find(marker)? + marker.len();
    let rest = &summary[start..];
    let end = rest.find("\n## ").unwrap_or(rest.len());
    let body = rest[..end].trim();
    if body.is_empty() { None } else { Some(body.to_string()) }
}

#[cfg(test)]
#[path = "transcript.test.rs"]
mod tests;
