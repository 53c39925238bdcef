//! Shared handles every router needs (spec §4.11), constructed once at
//! startup and cloned cheaply per request — the same shape the teacher's
//! `ServerState` takes, generalized past a single registry handle.

use std::path::PathBuf;
use std::sync::Arc;

use relay_compaction::CompactionService;
use relay_config::AiConfig;
use relay_context::ContextCalculator;
use relay_event_bus::EventBus;
use relay_model_registry::ModelRegistry;
use relay_provider::ProviderRegistry;
use relay_session_store::SessionStore;
use relay_streaming::StreamingEngine;
use relay_tools::ToolRegistry;
use relay_triggers::TriggerLayer;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub session_store: Arc<SessionStore>,
    pub event_bus: Arc<EventBus>,
    pub model_registry: Arc<ModelRegistry>,
    pub provider_registry: Arc<ProviderRegistry>,
    pub tool_registry: Arc<ToolRegistry>,
    pub trigger_layer: Arc<TriggerLayer>,
    pub config: Arc<RwLock<AiConfig>>,
    pub engine: Arc<StreamingEngine>,
    pub compaction: Arc<CompactionService>,
    pub calculator: Arc<ContextCalculator>,
    pub config_dir: PathBuf,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_store: Arc<SessionStore>,
        event_bus: Arc<EventBus>,
        model_registry: Arc<ModelRegistry>,
        provider_registry: Arc<ProviderRegistry>,
        tool_registry: Arc<ToolRegistry>,
        trigger_layer: Arc<TriggerLayer>,
        config: Arc<RwLock<AiConfig>>,
        config_dir: PathBuf,
    ) -> Self {
        let engine = Arc::new(StreamingEngine::new(
            Arc::clone(&session_store),
            Arc::clone(&event_bus),
            Arc::clone(&model_registry),
            Arc::clone(&provider_registry),
            Arc::clone(&tool_registry),
            Arc::clone(&trigger_layer),
            Arc::clone(&config),
        ));
        let compaction = Arc::new(CompactionService::new(Arc::clone(&session_store), Arc::clone(&event_bus)));
        Self {
            session_store,
            event_bus,
            model_registry,
            provider_registry,
            tool_registry,
            trigger_layer,
            config,
            engine,
            compaction,
            calculator: Arc::new(ContextCalculator::default()),
            config_dir,
        }
    }
}
