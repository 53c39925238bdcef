//! Session and Todo — spec §3.

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// A single todo item tracked against a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique within the owning session.
    pub id: u64,
    pub content: String,
    pub active_form: String,
    pub status: TodoStatus,
    pub ordering: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

/// A conversation between a client and one or more assistant turns.
///
/// A session owns its messages exclusively; deleting a session cascades to
/// every message, step, part, and file-content reference it holds (spec §3
/// Lifecycle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub provider_id: String,
    pub model_id: String,
    pub agent_id: String,
    /// Ordered; evaluated by the Trigger Layer in this order.
    pub enabled_rule_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Flag name -> value, mutated by the Trigger Layer.
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    /// Token count of the system prompt + tool schemas, fixed at creation.
    pub base_context_tokens: u64,
    /// `base_context_tokens + sum(message token counts)`.
    pub total_tokens: u64,
    /// Free-form; used to record compaction lineage (`compactedTo`/`compactedFrom`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub todos: Vec<Todo>,
    pub next_todo_id: u64,
}

impl Session {
    /// Creates a fresh session with no title, flags, todos, or accrued
    /// tokens — the state every `createSession` call starts from.
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
        agent_id: impl Into<String>,
        enabled_rule_ids: Vec<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            model_id: model_id.into(),
            agent_id: agent_id.into(),
            enabled_rule_ids,
            title: None,
            created_at: now_ms,
            updated_at: now_ms,
            flags: HashMap::new(),
            base_context_tokens: 0,
            total_tokens: 0,
            metadata: None,
            todos: Vec::new(),
            next_todo_id: 0,
        }
    }

    /// Merge `patch` into this session's flags, overwriting only the keys
    /// present in `patch` (spec §4.3 `updateSessionFlags`).
    pub fn apply_flag_patch(&mut self, patch: HashMap<String, bool>) {
        self.flags.extend(patch);
    }

    pub fn is_compacted(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("compactedTo"))
            .is_some()
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
