//! Background session-title generation (spec §4.8.1): spawned once per
//! session on its first assistant completion, if `session.title` is still
//! empty. Failures are swallowed — the title remains empty and generation
//! is re-attempted on the next completion.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use relay_context::ContentPart;
use relay_context::ModelMessage;
use relay_event_bus::EventBus;
use relay_protocol::MessageRole;
use relay_protocol::StreamEvent;
use relay_provider::CompletionOptions;
use relay_provider::Provider;
use relay_provider::ProviderStreamEvent;
use relay_session_store::SessionStore;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::events::emit;

const TITLE_PROMPT: &str = "Summarize the request below as a short conversation title (eight words or fewer, no trailing punctuation). Respond with the title only.\n\n";

#[allow(clippy::too_many_arguments)]
pub async fn generate_title(
    session_store: Arc<SessionStore>,
    event_bus: Arc<EventBus>,
    provider: Arc<dyn Provider>,
    provider_config: HashMap<String, String>,
    model_id: String,
    session_id: String,
    seed_text: String,
    now_ms: i64,
) {
    let prompt = vec![ModelMessage::new(MessageRole::User, vec![ContentPart::text(format!("{TITLE_PROMPT}{seed_text}"))])];
    let mut stream = match provider.open_completion(&provider_config, &model_id, &prompt, &[], &CompletionOptions::default(), CancellationToken::new()).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(session_id, %err, "title generation failed to open a completion");
            return;
        }
    };

    emit(&event_bus, &session_id, StreamEvent::SessionTitleUpdatedStart).await;
    let mut title = String::new();
    while let Some(event) = stream.next().await {
        match event {
            ProviderStreamEvent::TextDelta { text } => {
                title.push_str(&text);
                emit(&event_bus, &session_id, StreamEvent::SessionTitleUpdatedDelta { text }).await;
            }
            ProviderStreamEvent::Finish { .. } => break,
            _ => {}
        }
    }

    let title = title.trim().to_string();
    if title.is_empty() {
        warn!(session_id, "title generation produced an empty title");
        return;
    }
    emit(&event_bus, &session_id, StreamEvent::SessionTitleUpdatedEnd { title: title.clone() }).await;

    if let Err(err) = session_store.update_session_title(&session_id, Some(title.clone()), now_ms).await {
        warn!(session_id, %err, "failed to persist generated title");
        return;
    }
    emit(&event_bus, &session_id, StreamEvent::SessionTitleUpdated { title }).await;
}

#[cfg(test)]
#[path = "title.test.rs"]
mod tests;
