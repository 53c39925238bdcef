//! Typed CRUD over sessions, messages, steps, parts, and file content
//! (spec §4.3).

use std::collections::HashMap;
use std::sync::Arc;

use relay_protocol::FileContent;
use relay_protocol::Message;
use relay_protocol::MessageRole;
use relay_protocol::MessageStatus;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_protocol::Session;
use relay_protocol::Step;
use relay_protocol::Todo;
use relay_protocol::Usage;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::error::session_store_error::InvariantViolatedSnafu;
use crate::error::session_store_error::MessageNotFoundSnafu;
use crate::error::session_store_error::SessionNotFoundSnafu;
use crate::persistence::PersistedSession;
use crate::persistence::SessionPersistence;

/// Metadata-only view of a session, as returned by the listing and search
/// operations (spec §4.3: "metadata only: no messages").
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub id: String,
    pub provider_id: String,
    pub model_id: String,
    pub agent_id: String,
    pub title: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub total_tokens: u64,
}

impl From<&Session> for SessionMetadata {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            provider_id: session.provider_id.clone(),
            model_id: session.model_id.clone(),
            agent_id: session.agent_id.clone(),
            title: session.title.clone(),
            created_at: session.created_at,
            updated_at: session.updated_at,
            total_tokens: session.total_tokens,
        }
    }
}

/// A page of metadata plus an opaque cursor for the next page, or `None` if
/// this was the last page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

/// A patch to a session's token accounting (spec §4.3 `updateSessionTokens`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUpdate {
    pub base_context_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// Cursor over `(updated_at, created_at, id)` descending, matching the
/// ordering `getRecentSessionsMetadata` promises.
fn cursor_of(session: &Session) -> String {
    format!("{:020}:{:020}:{}", i64::MAX - session.updated_at, i64::MAX - session.created_at, session.id)
}

/// Holds every session, its messages, and out-of-line file content in
/// memory, backed by a pluggable [`SessionPersistence`] for durability.
///
/// Grounded in the teacher's session persistence pattern
/// (`app/session/src/persistence.rs`): one durable unit per session,
/// generalized here to also own the in-memory indices the store's typed
/// query surface needs (recency order, search).
pub struct SessionStore {
    persistence: Arc<dyn SessionPersistence>,
    sessions: RwLock<HashMap<String, Session>>,
    messages: RwLock<HashMap<String, Vec<Message>>>,
    file_contents: RwLock<HashMap<String, FileContent>>,
    last_session_id: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self {
            persistence,
            sessions: RwLock::new(HashMap::new()),
            messages: RwLock::new(HashMap::new()),
            file_contents: RwLock::new(HashMap::new()),
            last_session_id: RwLock::new(None),
        }
    }

    /// Loads every session the persistence backend knows about into memory.
    /// Call once at startup before serving requests.
    pub async fn restore(&self) -> Result<()> {
        for id in self.persistence.list_ids().await? {
            if let Some(snapshot) = self.persistence.load(&id).await? {
                self.sessions.write().await.insert(snapshot.session.id.clone(), snapshot.session);
                self.messages.write().await.insert(id, snapshot.messages);
            }
        }
        Ok(())
    }

    async fn persist(&self, session_id: &str) -> Result<()> {
        let session = self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        let messages = self.messages.read().await.get(session_id).cloned().unwrap_or_default();
        self.persistence.save(&PersistedSession::new(session, messages)).await
    }

    pub async fn create_session(
        &self,
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
        agent_id: impl Into<String>,
        enabled_rule_ids: Vec<String>,
        now_ms: i64,
    ) -> Result<Session> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), provider_id, model_id, agent_id, enabled_rule_ids, now_ms);
        self.sessions.write().await.insert(id.clone(), session.clone());
        self.messages.write().await.insert(id.clone(), Vec::new());
        *self.last_session_id.write().await = Some(id.clone());
        self.persist(&id).await?;
        Ok(session)
    }

    /// Loads a session with its messages (steps and parts) eagerly attached.
    pub async fn get_session_by_id(&self, id: &str) -> Result<Option<(Session, Vec<Message>)>> {
        let Some(session) = self.sessions.read().await.get(id).cloned() else {
            return Ok(None);
        };
        let messages = self.messages.read().await.get(id).cloned().unwrap_or_default();
        Ok(Some((session, messages)))
    }

    pub async fn get_recent_sessions_metadata(&self, limit: usize, cursor: Option<&str>) -> Result<Page<SessionMetadata>> {
        let sessions = self.sessions.read().await;
        let mut ordered: Vec<&Session> = sessions.values().collect();
        ordered.sort_by(|a, b| cursor_of(a).cmp(&cursor_of(b)));

        let start = match cursor {
            Some(c) => ordered.iter().position(|s| cursor_of(s).as_str() > c).unwrap_or(ordered.len()),
            None => 0,
        };
        let page: Vec<&Session> = ordered.into_iter().skip(start).take(limit).collect();
        let next_cursor = page.last().map(|s| cursor_of(s));
        let next_cursor = if page.len() < limit { None } else { next_cursor };
        Ok(Page { items: page.into_iter().map(SessionMetadata::from).collect(), next_cursor })
    }

    pub async fn search_sessions_metadata(&self, query: &str, limit: usize, cursor: Option<&str>) -> Result<Page<SessionMetadata>> {
        let needle = query.to_lowercase();
        let sessions = self.sessions.read().await;
        let mut matching: Vec<&Session> = sessions
            .values()
            .filter(|s| s.title.as_deref().is_some_and(|t| t.to_lowercase().contains(&needle)))
            .collect();
        matching.sort_by(|a, b| cursor_of(a).cmp(&cursor_of(b)));

        let start = match cursor {
            Some(c) => matching.iter().position(|s| cursor_of(s).as_str() > c).unwrap_or(matching.len()),
            None => 0,
        };
        let page: Vec<&Session> = matching.into_iter().skip(start).take(limit).collect();
        let next_cursor = page.last().map(|s| cursor_of(s));
        let next_cursor = if page.len() < limit { None } else { next_cursor };
        Ok(Page { items: page.into_iter().map(SessionMetadata::from).collect(), next_cursor })
    }

    async fn mutate_session<F>(&self, id: &str, now_ms: i64, mutate: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or_else(|| SessionNotFoundSnafu { session_id: id.to_string() }.build())?;
        mutate(session);
        session.updated_at = now_ms;
        let updated = session.clone();
        drop(sessions);
        self.persist(id).await?;
        Ok(updated)
    }

    pub async fn update_session_title(&self, id: &str, title: Option<String>, now_ms: i64) -> Result<Session> {
        self.mutate_session(id, now_ms, |s| s.title = title).await
    }

    pub async fn update_session_model(&self, id: &str, model_id: impl Into<String>, now_ms: i64) -> Result<Session> {
        let model_id = model_id.into();
        self.mutate_session(id, now_ms, |s| s.model_id = model_id).await
    }

    pub async fn update_session_provider(&self, id: &str, provider_id: impl Into<String>, now_ms: i64) -> Result<Session> {
        let provider_id = provider_id.into();
        self.mutate_session(id, now_ms, |s| s.provider_id = provider_id).await
    }

    pub async fn update_session_flags(&self, id: &str, flag_patch: HashMap<String, bool>, now_ms: i64) -> Result<Session> {
        self.mutate_session(id, now_ms, |s| s.apply_flag_patch(flag_patch)).await
    }

    /// Replaces a session's free-form metadata wholesale (spec §3: used to
    /// record compaction lineage, `compactedTo`/`compactedFrom`).
    pub async fn update_session_metadata(&self, id: &str, metadata: Option<serde_json::Value>, now_ms: i64) -> Result<Session> {
        self.mutate_session(id, now_ms, |s| s.metadata = metadata).await
    }

    pub async fn update_session_tokens(&self, id: &str, update: TokenUpdate, now_ms: i64) -> Result<Session> {
        self.mutate_session(id, now_ms, |s| {
            if let Some(base) = update.base_context_tokens {
                s.base_context_tokens = base;
            }
            if let Some(total) = update.total_tokens {
                s.total_tokens = total;
            }
        })
        .await
    }

    pub async fn update_session_enabled_rule_ids(&self, id: &str, enabled_rule_ids: Vec<String>, now_ms: i64) -> Result<Session> {
        self.mutate_session(id, now_ms, |s| s.enabled_rule_ids = enabled_rule_ids).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let removed = self.sessions.write().await.remove(id);
        if removed.is_none() {
            return Err(SessionNotFoundSnafu { session_id: id.to_string() }.build());
        }
        self.messages.write().await.remove(id);
        self.persistence.delete(id).await
    }

    pub async fn add_message(
        &self,
        session_id: &str,
        role: MessageRole,
        initial_parts: Vec<Part>,
        metadata: Option<relay_protocol::MessageMetadata>,
        todo_snapshot: Option<Vec<Todo>>,
        now_ms: i64,
    ) -> Result<String> {
        if !self.sessions.read().await.contains_key(session_id) {
            return Err(SessionNotFoundSnafu { session_id: session_id.to_string() }.build());
        }
        let id = uuid::Uuid::new_v4().to_string();
        let initial_status = match role {
            MessageRole::Assistant => MessageStatus::Active,
            MessageRole::User | MessageRole::System => MessageStatus::Completed,
        };
        let mut steps = Vec::new();
        if !initial_parts.is_empty() {
            let mut step = Step::new(0);
            step.parts = initial_parts;
            steps.push(step);
        }
        let message = Message {
            id: id.clone(),
            session_id: session_id.to_string(),
            role,
            steps,
            created_at: now_ms,
            status: initial_status,
            usage: None,
            finish_reason: None,
            metadata,
            todo_snapshot,
        };
        self.messages.write().await.entry(session_id.to_string()).or_default().push(message);
        self.persist(session_id).await?;
        Ok(id)
    }

    fn find_message<'a>(messages: &'a mut [Message], message_id: &str) -> Option<&'a mut Message> {
        messages.iter_mut().find(|m| m.id == message_id)
    }

    async fn session_id_for_message(&self, message_id: &str) -> Result<String> {
        let messages = self.messages.read().await;
        for (session_id, msgs) in messages.iter() {
            if msgs.iter().any(|m| m.id == message_id) {
                return Ok(session_id.clone());
            }
        }
        Err(MessageNotFoundSnafu { message_id: message_id.to_string() }.build())
    }

    pub async fn append_step(&self, message_id: &str, step_index: u32, parts: Vec<Part>) -> Result<()> {
        let session_id = self.session_id_for_message(message_id).await?;
        let mut messages = self.messages.write().await;
        let msgs = messages.get_mut(&session_id).expect("session indexed by session_id_for_message");
        let message = Self::find_message(msgs, message_id).ok_or_else(|| MessageNotFoundSnafu { message_id: message_id.to_string() }.build())?;
        if step_index != message.next_step_index() {
            return Err(InvariantViolatedSnafu {
                message: format!("step index {step_index} is not the next expected index {}", message.next_step_index()),
            }
            .build());
        }
        let mut step = Step::new(step_index);
        step.parts = parts;
        message.steps.push(step);
        drop(messages);
        self.persist(&session_id).await
    }

    pub async fn append_part(&self, message_id: &str, step_index: u32, part: Part) -> Result<()> {
        let session_id = self.session_id_for_message(message_id).await?;
        let mut messages = self.messages.write().await;
        let msgs = messages.get_mut(&session_id).expect("session indexed by session_id_for_message");
        let message = Self::find_message(msgs, message_id).ok_or_else(|| MessageNotFoundSnafu { message_id: message_id.to_string() }.build())?;
        let step = message
            .steps
            .iter_mut()
            .find(|s| s.step_index == step_index)
            .ok_or_else(|| InvariantViolatedSnafu { message: format!("step {step_index} does not exist on message {message_id}") }.build())?;
        step.parts.push(part);
        drop(messages);
        self.persist(&session_id).await
    }

    /// Transitions the named tool call's part in place — same `tool_id`,
    /// new `status`/`result`/`error`/`duration_ms` — rather than appending a
    /// new part (spec §4.8 step 5: "in-place status transition from
    /// `active` to `completed|error`").
    pub async fn update_tool_part(
        &self,
        message_id: &str,
        tool_call_id: &str,
        status: PartStatus,
        result: Option<serde_json::Value>,
        error: Option<String>,
        duration_ms: u64,
    ) -> Result<()> {
        let session_id = self.session_id_for_message(message_id).await?;
        let mut messages = self.messages.write().await;
        let msgs = messages.get_mut(&session_id).expect("session indexed by session_id_for_message");
        let message = Self::find_message(msgs, message_id).ok_or_else(|| MessageNotFoundSnafu { message_id: message_id.to_string() }.build())?;
        let part = message
            .steps
            .iter_mut()
            .flat_map(|step| step.parts.iter_mut())
            .find(|part| matches!(part, Part::Tool { tool_id, .. } if tool_id == tool_call_id))
            .ok_or_else(|| InvariantViolatedSnafu { message: format!("tool part {tool_call_id} does not exist on message {message_id}") }.build())?;
        let Part::Tool { status: part_status, result: part_result, error: part_error, duration_ms: part_duration, .. } = part else {
            unreachable!("matched above");
        };
        *part_status = status;
        *part_result = result;
        *part_error = error;
        *part_duration = Some(duration_ms);
        drop(messages);
        self.persist(&session_id).await
    }

    pub async fn update_message_status(
        &self,
        message_id: &str,
        status: MessageStatus,
        usage: Option<Usage>,
        finish_reason: Option<String>,
    ) -> Result<()> {
        let session_id = self.session_id_for_message(message_id).await?;
        let mut messages = self.messages.write().await;
        let msgs = messages.get_mut(&session_id).expect("session indexed by session_id_for_message");
        let message = Self::find_message(msgs, message_id).ok_or_else(|| MessageNotFoundSnafu { message_id: message_id.to_string() }.build())?;
        if !message.try_transition_status(status) {
            return Err(InvariantViolatedSnafu {
                message: format!("cannot transition message {message_id} from {:?} to {status:?}", message.status),
            }
            .build());
        }
        if usage.is_some() {
            message.usage = usage;
        }
        if finish_reason.is_some() {
            message.finish_reason = finish_reason;
        }
        drop(messages);
        self.persist(&session_id).await
    }

    pub async fn store_file_content(&self, content: Vec<u8>, media_type: impl Into<String>) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let file_content = FileContent::new(id.clone(), content, media_type);
        self.file_contents.write().await.insert(id.clone(), file_content);
        Ok(id)
    }

    pub async fn get_file_content(&self, id: &str) -> Result<Option<FileContent>> {
        Ok(self.file_contents.read().await.get(id).cloned())
    }

    pub async fn update_todos(&self, session_id: &str, todos: Vec<Todo>, next_todo_id: u64) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id).ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        if next_todo_id < session.next_todo_id {
            return Err(InvariantViolatedSnafu {
                message: format!("next_todo_id must be monotone non-decreasing: {next_todo_id} < {}", session.next_todo_id),
            }
            .build());
        }
        session.todos = todos;
        session.next_todo_id = next_todo_id;
        let updated = session.clone();
        drop(sessions);
        self.persist(session_id).await?;
        Ok(updated)
    }

    pub async fn get_session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn get_last_session(&self) -> Option<Session> {
        let last_id = self.last_session_id.read().await.clone()?;
        self.sessions.read().await.get(&last_id).cloned()
    }
}

#[cfg(test)]
#[path = "store.test.rs"]
mod tests;
