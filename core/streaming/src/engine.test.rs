use std::time::Duration;

use futures::StreamExt;
use relay_error::ErrorExt;
use relay_error::StatusCode;
use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_model_registry::ProviderEntry;
use relay_protocol::MessageStatus;
use relay_protocol::StreamEvent;
use relay_provider::PassthroughProvider;
use relay_provider::ProviderRegistry;
use relay_provider::passthrough_model;
use relay_session_store::NullPersistence;
use relay_session_store::SessionStore;
use relay_tools::ToolRegistry;
use relay_triggers::TriggerLayer;

use super::*;

fn test_engine() -> (Arc<StreamingEngine>, Arc<SessionStore>) {
    let session_store = Arc::new(SessionStore::new(Arc::new(NullPersistence)));
    let event_bus = Arc::new(EventBus::new(None));
    let model_registry = Arc::new(ModelRegistry::new(
        vec![ProviderEntry { id: "passthrough".to_string(), name: "Passthrough".to_string(), provider_type: relay_protocol::ProviderType::OpenaiCompat }],
        vec![passthrough_model()],
    ));
    let provider_registry = Arc::new(ProviderRegistry::new());
    provider_registry.register(Arc::new(PassthroughProvider));
    let tool_registry = Arc::new(ToolRegistry::new());
    let trigger_layer = Arc::new(TriggerLayer::new());
    let config = Arc::new(RwLock::new(AiConfig::default()));

    let engine = Arc::new(StreamingEngine::new(session_store.clone(), event_bus, model_registry, provider_registry, tool_registry, trigger_layer, config));
    (engine, session_store)
}

async fn next_terminal(events: &mut relay_event_bus::EventStream) -> StreamEvent {
    loop {
        let event = events.next().await.expect("stream ended before a terminal event");
        let parsed: StreamEvent = serde_json::from_value(event.payload).expect("valid StreamEvent payload");
        if parsed.is_terminal() {
            return parsed;
        }
    }
}

#[tokio::test]
async fn trigger_stream_runs_a_full_turn_against_passthrough() {
    let (engine, session_store) = test_engine();
    let input = TriggerStreamInput {
        provider_id: Some("passthrough".to_string()),
        model_id: Some(relay_provider::PASSTHROUGH_MODEL_ID.to_string()),
        content: Some(vec![Part::Text { content: "hello there".to_string(), status: PartStatus::Completed }]),
        ..Default::default()
    };

    let output = engine.trigger_stream(input).await.expect("trigger_stream should succeed");
    let mut events = engine.subscribe(&output.session_id, 50).await;

    let terminal = next_terminal(&mut events).await;
    assert!(matches!(terminal, StreamEvent::Complete { .. }));

    let (session, messages) = session_store.get_session_by_id(&output.session_id).await.unwrap().unwrap();
    assert_eq!(session.provider_id, "passthrough");
    let assistant = messages.iter().find(|m| matches!(m.role, MessageRole::Assistant)).expect("assistant message exists");
    assert_eq!(assistant.status, MessageStatus::Completed);
    let text: String = assistant
        .steps
        .iter()
        .flat_map(|s| s.parts.iter())
        .filter_map(|p| match p {
            Part::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "echo: hello there ");
}

#[tokio::test]
async fn trigger_stream_rejects_a_second_stream_on_a_busy_session() {
    let (engine, _session_store) = test_engine();
    let create = TriggerStreamInput {
        provider_id: Some("passthrough".to_string()),
        model_id: Some(relay_provider::PASSTHROUGH_MODEL_ID.to_string()),
        content: Some(vec![Part::Text { content: "first".to_string(), status: PartStatus::Completed }]),
        ..Default::default()
    };
    let output = engine.trigger_stream(create).await.expect("first trigger_stream should succeed");

    let second = TriggerStreamInput {
        session_id: Some(output.session_id.clone()),
        content: Some(vec![Part::Text { content: "second".to_string(), status: PartStatus::Completed }]),
        ..Default::default()
    };
    let err = engine.trigger_stream(second).await.expect_err("a stream is already active on this session");
    assert_eq!(err.status_code(), StatusCode::SessionBusy);
}

#[tokio::test]
async fn trigger_stream_rejects_an_unknown_provider() {
    let (engine, _session_store) = test_engine();
    let input = TriggerStreamInput { provider_id: Some("does-not-exist".to_string()), model_id: Some("m".to_string()), ..Default::default() };
    let err = engine.trigger_stream(input).await.expect_err("unknown provider should be rejected");
    assert!(matches!(err, StreamingError::UnknownProvider { .. }));
}

#[tokio::test]
async fn abort_before_any_content_ends_the_turn_in_abort_status() {
    let (engine, session_store) = test_engine();
    let input = TriggerStreamInput {
        provider_id: Some("passthrough".to_string()),
        model_id: Some(relay_provider::PASSTHROUGH_MODEL_ID.to_string()),
        content: Some(vec![Part::Text { content: "hello".to_string(), status: PartStatus::Completed }]),
        ..Default::default()
    };

    let output = engine.trigger_stream(input).await.expect("trigger_stream should succeed");
    let mut events = engine.subscribe(&output.session_id, 50).await;
    engine.abort(&output.session_id);

    let terminal = next_terminal(&mut events).await;
    assert!(matches!(terminal, StreamEvent::Abort));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let (_, messages) = session_store.get_session_by_id(&output.session_id).await.unwrap().unwrap();
    let assistant = messages.iter().find(|m| matches!(m.role, MessageRole::Assistant)).expect("assistant message exists");
    assert_eq!(assistant.status, MessageStatus::Abort);
}
