//! Per-invocation context handed to a [`crate::tool::Tool`] (spec §4.6:
//! "its only outputs to the engine are its return value and, optionally, a
//! structured progress channel").

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A progress update a long-running tool may emit before it finishes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolProgress {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Execution context for one tool call.
pub struct ToolContext {
    pub session_id: String,
    pub tool_call_id: String,
    pub cancel: CancellationToken,
    progress: Option<mpsc::UnboundedSender<ToolProgress>>,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, tool_call_id: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            session_id: session_id.into(),
            tool_call_id: tool_call_id.into(),
            cancel,
            progress: None,
        }
    }

    pub fn with_progress_sender(mut self, sender: mpsc::UnboundedSender<ToolProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Emits a progress update; silently dropped if nobody is listening.
    pub fn report_progress(&self, message: impl Into<String>, detail: Option<serde_json::Value>) {
        if let Some(sender) = &self.progress {
            let _ = sender.send(ToolProgress { message: message.into(), detail });
        }
    }
}

#[cfg(test)]
#[path = "context.test.rs"]
mod tests;
