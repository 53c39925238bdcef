//! Wire-format request/response shapes for the RPC layer (spec §4.11, §6).
//!
//! These are deliberately distinct from `relay-protocol`'s internal types:
//! procedure params and top-level results follow spec.md's camelCase JSON
//! examples (`sessionId`, `agentId`, `enabledRuleIds`, ...), while nested
//! domain objects (`Message`, `Part`, `Session`) keep whatever casing
//! `relay-protocol` already serializes them as.

use relay_protocol::Cursor;
use relay_protocol::Part;
use relay_protocol::ResourceSnapshot;
use relay_protocol::Session;
use relay_protocol::Todo;
use relay_session_store::Page;
use relay_session_store::SessionMetadata;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T, U: From<T>> From<Page<T>> for PageDto<U> {
    fn from(page: Page<T>) -> Self {
        Self { items: page.items.into_iter().map(U::from).collect(), next_cursor: page.next_cursor }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadataDto {
    pub id: String,
    pub provider_id: String,
    pub model_id: String,
    pub agent_id: String,
    pub title: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub total_tokens: u64,
}

impl From<SessionMetadata> for SessionMetadataDto {
    fn from(m: SessionMetadata) -> Self {
        Self {
            id: m.id,
            provider_id: m.provider_id,
            model_id: m.model_id,
            agent_id: m.agent_id,
            title: m.title,
            created_at: m.created_at,
            updated_at: m.updated_at,
            total_tokens: m.total_tokens,
        }
    }
}

/// The full session record as sent over the wire. `Session`'s own field
/// casing is internal; this is the camelCase projection of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub provider_id: String,
    pub model_id: String,
    pub agent_id: String,
    pub enabled_rule_ids: Vec<String>,
    pub title: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub base_context_tokens: u64,
    pub total_tokens: u64,
    pub todos: Vec<Todo>,
    pub next_todo_id: u64,
}

impl From<&Session> for SessionDto {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.clone(),
            provider_id: s.provider_id.clone(),
            model_id: s.model_id.clone(),
            agent_id: s.agent_id.clone(),
            enabled_rule_ids: s.enabled_rule_ids.clone(),
            title: s.title.clone(),
            created_at: s.created_at,
            updated_at: s.updated_at,
            base_context_tokens: s.base_context_tokens,
            total_tokens: s.total_tokens,
            todos: s.todos.clone(),
            next_todo_id: s.next_todo_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRecentParams {
    pub limit: usize,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: String,
    pub limit: usize,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdParams {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionParams {
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub enabled_rule_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTitleParams {
    pub session_id: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModelParams {
    pub session_id: String,
    pub model_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderParams {
    pub session_id: String,
    pub provider_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRulesParams {
    pub session_id: String,
    pub enabled_rule_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdResult {
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TriggerStreamParams {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub enabled_rule_ids: Option<Vec<String>>,
    #[serde(default)]
    pub content: Option<Vec<Part>>,
    #[serde(default)]
    pub resource_snapshot: Option<ResourceSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSubscribeParams {
    pub session_id: String,
    #[serde(default)]
    pub replay_last: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsSubscribeParams {
    pub pattern: String,
    #[serde(default)]
    pub from_cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsSubscribeToSessionParams {
    pub session_id: String,
    #[serde(default)]
    pub replay_last: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdateParams {
    pub session_id: String,
    pub todos: Vec<Todo>,
    pub next_todo_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProviderSchemaParams {
    pub provider_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRulesParams {
    pub enabled_rule_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountFileTokensParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountFileTokensResult {
    pub tokens: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactResultDto {
    pub new_session_id: String,
    pub summary: String,
    pub old_session_id: String,
    pub old_session_title: Option<String>,
    pub message_count: usize,
}

impl From<relay_compaction::CompactionResult> for CompactResultDto {
    fn from(r: relay_compaction::CompactionResult) -> Self {
        Self {
            new_session_id: r.new_session_id,
            summary: r.summary,
            old_session_id: r.old_session_id,
            old_session_title: r.old_session_title,
            message_count: r.message_count,
        }
    }
}
