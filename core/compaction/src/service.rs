//! The compaction algorithm (spec §4.10): summarize an existing session
//! into a new one, inserting the summary as a transitional first user
//! message.
//!
//! Grounded in `core/loop::compaction`/`session_memory_agent` (the
//! summarization-prompt construction lives in [`crate::transcript`]) and
//! `core/loop::driver`'s per-session `Mutex` locking pattern, scoped here
//! to the source session only.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use relay_context::ContentPart;
use relay_context::ModelMessage;
use relay_protocol::MessageRole;
use relay_provider::CompletionOptions;
use relay_provider::Provider;
use relay_provider::ProviderStreamEvent;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing::instrument;

use crate::error::Result;
use crate::error::compaction_error::EmptySessionSnafu;
use crate::error::compaction_error::EmptySummarySnafu;
use crate::error::compaction_error::ProviderSnafu;
use crate::error::compaction_error::SessionNotFoundSnafu;
use crate::error::compaction_error::StoreSnafu;
use crate::transcript;
use relay_event_bus::EventBus;
use relay_session_store::SessionStore;
use snafu::ResultExt;

/// What `compact` returns on success (spec §4.10 `compact` contract).
#[derive(Debug, Clone)]
pub struct CompactionResult {
    pub new_session_id: String,
    pub summary: String,
    pub old_session_id: String,
    pub old_session_title: Option<String>,
    pub message_count: usize,
}

/// Per-session mutual exclusion so only one compaction runs against a
/// given source session at a time (spec §4.10 "under a dedicated lock").
#[derive(Default)]
struct CompactionLocks {
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CompactionLocks {
    fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks.lock().expect("lock map mutex poisoned").entry(session_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

pub struct CompactionService {
    session_store: Arc<SessionStore>,
    event_bus: Arc<EventBus>,
    locks: CompactionLocks,
}

impl CompactionService {
    pub fn new(session_store: Arc<SessionStore>, event_bus: Arc<EventBus>) -> Self {
        Self { session_store, event_bus, locks: CompactionLocks::default() }
    }

    #[instrument(skip(self, provider, provider_config), fields(session_id = %session_id))]
    pub async fn compact(
        &self,
        session_id: &str,
        provider: Arc<dyn Provider>,
        provider_config: &HashMap<String, String>,
        model_id: &str,
        now_ms: i64,
    ) -> Result<CompactionResult> {
        let lock = self.locks.lock_for(session_id);
        let _guard = lock.lock().await;
        self.compact_locked(session_id, provider, provider_config, model_id, now_ms).await
    }

    async fn compact_locked(
        &self,
        session_id: &str,
        provider: Arc<dyn Provider>,
        provider_config: &HashMap<String, String>,
        model_id: &str,
        now_ms: i64,
    ) -> Result<CompactionResult> {
        // Step 1: validate.
        let (old_session, messages) =
            self.session_store.get_session_by_id(session_id).await.context(StoreSnafu)?.ok_or_else(|| SessionNotFoundSnafu { session_id: session_id.to_string() }.build())?;
        if messages.is_empty() {
            return Err(EmptySessionSnafu { session_id: session_id.to_string() }.build());
        }
        let message_count = messages.len();

        // Step 2: serialize transcript.
        let transcript = transcript::serialize_transcript(&messages);
        let prompt = vec![ModelMessage::new(MessageRole::User, vec![ContentPart::text(summarization_instructions(&transcript))])];

        // Step 3: one-shot completion, no token cap.
        let summary = self.summarize(provider, provider_config, model_id, &prompt).await?;
        if summary.trim().is_empty() {
            return Err(EmptySummarySnafu.build());
        }
        info!(session_id, current_work = transcript::extract_current_work(&summary).is_some(), "compaction summary produced");

        // Step 4: create the new session.
        let old_title = old_session.title.clone();
        let new_title = format!("{} (continued)", old_title.clone().unwrap_or_else(|| "Untitled session".to_string()));
        let new_session = self
            .session_store
            .create_session(old_session.provider_id.clone(), old_session.model_id.clone(), old_session.agent_id.clone(), old_session.enabled_rule_ids.clone(), now_ms)
            .await
            .context(StoreSnafu)?;
        self.session_store.update_session_title(&new_session.id, Some(new_title), now_ms).await.context(StoreSnafu)?;

        // Step 5: insert the summary as the new session's first user message.
        let seeded = transcript::with_preamble(&summary);
        if let Err(err) = self
            .session_store
            .add_message(&new_session.id, MessageRole::User, vec![relay_protocol::Part::Text { content: seeded, status: relay_protocol::PartStatus::Completed }], None, None, now_ms)
            .await
        {
            // Roll back the new session; the old one is untouched.
            let _ = self.session_store.delete_session(&new_session.id).await;
            return Err(err).context(StoreSnafu);
        }

        // Step 6: record lineage on both sessions. The new session is
        // written first, since it is not yet observable under its own id
        // until this call returns and a failure here only needs to delete
        // it. Only once that succeeds do we touch the old session; if that
        // second write fails, the new session's lineage metadata is
        // reverted before it's deleted, so the old session is left exactly
        // as it was (neither `compactedTo` nor `compactedFrom` set).
        if let Err(err) = self
            .session_store
            .update_session_metadata(
                &new_session.id,
                Some(serde_json::json!({
                    "compactedFrom": session_id,
                    "originalTitle": old_title,
                    "originalMessageCount": message_count,
                })),
                now_ms,
            )
            .await
        {
            let _ = self.session_store.delete_session(&new_session.id).await;
            return Err(err).context(StoreSnafu);
        }
        if let Err(err) = self
            .session_store
            .update_session_metadata(
                session_id,
                Some(serde_json::json!({ "compacted": true, "compactedTo": new_session.id, "compactedAt": now_ms })),
                now_ms,
            )
            .await
        {
            let _ = self.session_store.update_session_metadata(&new_session.id, None, now_ms).await;
            let _ = self.session_store.delete_session(&new_session.id).await;
            return Err(err).context(StoreSnafu);
        }

        // Step 7: emit lifecycle events on the old session's channel.
        self.event_bus
            .publish(
                session_id,
                "session-compacted",
                serde_json::json!({
                    "oldSessionId": session_id,
                    "newSessionId": new_session.id,
                    "summary": summary,
                    "messageCount": message_count,
                }),
            )
            .await;
        self.event_bus
            .publish(
                &new_session.id,
                "session-created",
                serde_json::json!({
                    "sessionId": new_session.id,
                    "provider": new_session.provider_id,
                    "model": new_session.model_id,
                }),
            )
            .await;

        Ok(CompactionResult { new_session_id: new_session.id, summary, old_session_id: session_id.to_string(), old_session_title: old_title, message_count })
    }

    async fn summarize(&self, provider: Arc<dyn Provider>, provider_config: &HashMap<String, String>, model_id: &str, prompt: &[ModelMessage]) -> Result<String> {
        let mut stream = provider
            .open_completion(provider_config, model_id, prompt, &[], &CompletionOptions::default(), CancellationToken::new())
            .await
            .context(ProviderSnafu)?;

        let mut text = String::new();
        while let Some(event) = stream.next().await {
            match event {
                ProviderStreamEvent::TextDelta { text: delta } => text.push_str(&delta),
                ProviderStreamEvent::Finish { .. } => break,
                _ => {}
            }
        }
        Ok(text)
    }
}

fn summarization_instructions(transcript: &str) -> String {
    format!(
        "Summarize the following conversation for continuation in a new session. \
Include a \"## Current Work\" section describing any in-progress task, if one is detectable.\n\n{transcript}"
    )
}

#[cfg(test)]
#[path = "service.test.rs"]
mod tests;
