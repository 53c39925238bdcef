use std::sync::Arc;

use async_trait::async_trait;
use futures::stream;
use relay_protocol::MessageRole;
use relay_protocol::Part;
use relay_protocol::PartStatus;
use relay_provider::CompletionStream;
use relay_provider::ConfigField;
use relay_provider::ModelDetails;
use relay_provider::Provider;
use relay_provider::ProviderConfig;
use relay_provider::ProviderStreamEvent;
use relay_provider::ToolSchema;
use relay_session_store::NullPersistence;
use relay_session_store::SessionStore;

use super::*;

struct FixedSummaryProvider {
    summary: String,
}

#[async_trait]
impl Provider for FixedSummaryProvider {
    fn id(&self) -> &str {
        "fixed"
    }

    fn name(&self) -> &str {
        "Fixed"
    }

    fn description(&self) -> &str {
        "test double"
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        Vec::new()
    }

    async fn fetch_models(&self, _config: &ProviderConfig) -> relay_provider::error::Result<Vec<relay_protocol::ModelInfo>> {
        Ok(Vec::new())
    }

    async fn model_details(&self, _model_id: &str, _config: &ProviderConfig) -> relay_provider::error::Result<Option<ModelDetails>> {
        Ok(None)
    }

    async fn open_completion(
        &self,
        _config: &ProviderConfig,
        _model_id: &str,
        _prompt: &[relay_context::ModelMessage],
        _tools: &[ToolSchema],
        _options: &CompletionOptions,
        _cancel: CancellationToken,
    ) -> relay_provider::error::Result<CompletionStream> {
        let events = vec![
            ProviderStreamEvent::TextDelta { text: self.summary.clone() },
            ProviderStreamEvent::Finish { usage: relay_protocol::Usage::default(), finish_reason: "stop".to_string() },
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

fn harness() -> (Arc<SessionStore>, Arc<EventBus>, CompactionService) {
    let session_store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let service = CompactionService::new(session_store.clone(), event_bus.clone());
    (session_store, event_bus, service)
}

#[tokio::test]
async fn compact_rejects_unknown_session() {
    let (_store, _bus, service) = harness();
    let provider: Arc<dyn Provider> = Arc::new(FixedSummaryProvider { summary: "x".to_string() });
    let result = service.compact("missing", provider, &HashMap::new(), "m1", 0).await;
    assert!(matches!(result, Err(CompactionError::SessionNotFound { .. })));
}

#[tokio::test]
async fn compact_rejects_empty_session() {
    let (store, _bus, service) = harness();
    let session = store.create_session("anthropic", "claude", "default", vec![], 0).await.unwrap();
    let provider: Arc<dyn Provider> = Arc::new(FixedSummaryProvider { summary: "x".to_string() });
    let result = service.compact(&session.id, provider, &HashMap::new(), "m1", 1).await;
    assert!(matches!(result, Err(CompactionError::EmptySession { .. })));
}

#[tokio::test]
async fn compact_creates_a_new_session_with_lineage_and_summary() {
    let (store, _bus, service) = harness();
    let session = store.create_session("anthropic", "claude", "default", vec!["rule-1".to_string()], 0).await.unwrap();
    store.update_session_title(&session.id, Some("Refactor auth".to_string()), 0).await.unwrap();
    store
        .add_message(&session.id, MessageRole::User, vec![Part::Text { content: "please refactor auth".to_string(), status: PartStatus::Completed }], None, None, 1)
        .await
        .unwrap();

    let summary = "## Summary\nRefactored auth.\n\n## Current Work\nFinishing token refresh.".to_string();
    let provider: Arc<dyn Provider> = Arc::new(FixedSummaryProvider { summary: summary.clone() });

    let result = service.compact(&session.id, provider, &HashMap::new(), "m1", 2).await.unwrap();
    assert_eq!(result.old_session_id, session.id);
    assert_eq!(result.summary, summary);
    assert_eq!(result.message_count, 1);

    let (old_session, _) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    assert!(old_session.is_compacted());
    assert_eq!(old_session.metadata.unwrap()["compactedTo"], result.new_session_id);

    let (new_session, new_messages) = store.get_session_by_id(&result.new_session_id).await.unwrap().unwrap();
    assert_eq!(new_session.title.as_deref(), Some("Refactor auth (continued)"));
    assert_eq!(new_session.provider_id, "anthropic");
    assert_eq!(new_session.enabled_rule_ids, vec!["rule-1".to_string()]);
    assert_eq!(new_session.metadata.unwrap()["compactedFrom"], session.id);
    assert_eq!(new_messages.len(), 1);
}

#[tokio::test]
async fn compact_rejects_empty_summary() {
    let (store, _bus, service) = harness();
    let session = store.create_session("anthropic", "claude", "default", vec![], 0).await.unwrap();
    store.add_message(&session.id, MessageRole::User, vec![Part::Text { content: "hi".to_string(), status: PartStatus::Completed }], None, None, 1).await.unwrap();

    let provider: Arc<dyn Provider> = Arc::new(FixedSummaryProvider { summary: "   ".to_string() });
    let result = service.compact(&session.id, provider, &HashMap::new(), "m1", 2).await;
    assert!(matches!(result, Err(CompactionError::EmptySummary { .. })));

    // Failure must leave the old session untouched.
    let (old_session, _) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    assert!(!old_session.is_compacted());
}
