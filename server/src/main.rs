//! Binary entry point: wires up every core crate into one [`AppState`],
//! registers the routers, and serves the HTTP/SSE transport (spec §4.11).
//! Grounded in the teacher's `querymt-service::main` startup shape
//! (tracing init, `Router` + `CorsLayer`, `TcpListener` + `axum::serve`).

use std::sync::Arc;

use relay_event_bus::EventBus;
use relay_event_log::JsonlEventLog;
use relay_model_registry::ModelRegistry;
use relay_model_registry::ProviderEntry;
use relay_protocol::ProviderType;
use relay_provider::PassthroughProvider;
use relay_provider::ProviderRegistry;
use relay_server::AppState;
use relay_server::RpcDispatcher;
use relay_server::http::build_router;
use relay_server::routers::ConfigRouter;
use relay_server::routers::EventsRouter;
use relay_server::routers::MessageRouter;
use relay_server::routers::SessionRouter;
use relay_server::routers::TodoRouter;
use relay_session_store::JsonFilePersistence;
use relay_session_store::SessionStore;
use relay_tools::ToolRegistry;
use relay_triggers::ContextUsageTrigger;
use relay_triggers::ResourcePressureTrigger;
use relay_triggers::TriggerLayer;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable overriding the bind address, default `0.0.0.0:8080`.
const ADDR_ENV: &str = "RELAY_SERVER_ADDR";

fn bind_addr() -> String {
    std::env::var(ADDR_ENV).unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("relay_server=info,tower_http=info"));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config_dir = relay_config::config_dir();
    let config = relay_config::load(&config_dir)?;
    info!(config_dir = %config_dir.display(), "loaded configuration");

    let events_dir = config_dir.join("events");
    let sessions_dir = config_dir.join("sessions");
    let event_bus = Arc::new(EventBus::new(Some(Arc::new(JsonlEventLog::new(events_dir)))));
    let session_store = Arc::new(SessionStore::new(Arc::new(JsonFilePersistence::new(sessions_dir))));
    session_store.restore().await?;

    let model_registry = Arc::new(ModelRegistry::new(
        vec![ProviderEntry { id: "passthrough".to_string(), name: "Passthrough".to_string(), provider_type: ProviderType::OpenaiCompat }],
        vec![relay_provider::passthrough_model()],
    ));
    let provider_registry = Arc::new(ProviderRegistry::new());
    provider_registry.register(Arc::new(PassthroughProvider));

    let tool_registry = Arc::new(ToolRegistry::new());

    let mut triggers = TriggerLayer::new();
    triggers.register(Arc::new(ContextUsageTrigger::warning_80(10)));
    triggers.register(Arc::new(ContextUsageTrigger::warning_90(20)));
    triggers.register(Arc::new(ResourcePressureTrigger::new(0.80, 5)));
    let trigger_layer = Arc::new(triggers);

    let config = Arc::new(RwLock::new(config));

    let state = AppState::new(
        session_store,
        event_bus,
        model_registry,
        provider_registry,
        tool_registry,
        trigger_layer,
        config,
        config_dir,
    );

    let dispatcher = Arc::new(RpcDispatcher::new(vec![
        Arc::new(SessionRouter::new(state.clone())),
        Arc::new(MessageRouter::new(state.clone())),
        Arc::new(EventsRouter::new(state.clone())),
        Arc::new(ConfigRouter::new(state.clone())),
        Arc::new(TodoRouter::new(state.clone())),
    ]));

    let app = build_router(dispatcher);
    let addr = bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "rpc server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
