use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use relay_protocol::StreamEvent;
use relay_provider::CompletionOptions;
use relay_provider::CompletionStream;
use relay_provider::ConfigField;
use relay_provider::ModelDetails;
use relay_provider::Provider;
use relay_provider::ProviderConfig;
use relay_provider::ToolSchema;
use relay_session_store::NullPersistence;
use relay_session_store::SessionStore;
use tokio_util::sync::CancellationToken;

use super::*;

struct FixedTextProvider {
    text: String,
}

#[async_trait]
impl Provider for FixedTextProvider {
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
            ProviderStreamEvent::TextDelta { text: self.text.clone() },
            ProviderStreamEvent::Finish { usage: relay_protocol::Usage::default(), finish_reason: "stop".to_string() },
        ];
        Ok(Box::pin(stream::iter(events)))
    }
}

#[tokio::test]
async fn generates_and_persists_a_title() {
    let store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let session = store.create_session("anthropic", "claude", "default", vec![], 0).await.unwrap();

    let mut events = event_bus.subscribe(&session.id, None).await;
    let provider: Arc<dyn Provider> = Arc::new(FixedTextProvider { text: "Refactor auth flow".to_string() });

    generate_title(store.clone(), event_bus.clone(), provider, HashMap::new(), "m1".to_string(), session.id.clone(), "please refactor auth".to_string(), 5).await;

    let (updated, _) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    assert_eq!(updated.title.as_deref(), Some("Refactor auth flow"));

    let mut saw_end = false;
    for _ in 0..4 {
        let Some(event) = events.next().await else { break };
        if let Ok(StreamEvent::SessionTitleUpdatedEnd { title }) = serde_json::from_value::<StreamEvent>(event.payload) {
            assert_eq!(title, "Refactor auth flow");
            saw_end = true;
        }
    }
    assert!(saw_end, "expected a session-title-updated-end event");
}

#[tokio::test]
async fn blank_completion_leaves_title_empty() {
    let store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let session = store.create_session("anthropic", "claude", "default", vec![], 0).await.unwrap();

    let provider: Arc<dyn Provider> = Arc::new(FixedTextProvider { text: "   ".to_string() });
    generate_title(store.clone(), event_bus, provider, HashMap::new(), "m1".to_string(), session.id.clone(), "hi".to_string(), 5).await;

    let (updated, _) = store.get_session_by_id(&session.id).await.unwrap().unwrap();
    assert!(updated.title.is_none());
}
