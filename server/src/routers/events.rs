//! The `events` router (spec §4.11): subscription-only access to the Event
//! Bus, independent of any particular session's stream.
//!
//! `pattern` is treated as an exact channel name: channels in this system
//! are 1:1 with session ids (`relay_streaming::events::emit` always
//! publishes to the session's own channel), so there is no cross-channel
//! wildcard to match against. A glob/prefix matcher would need the Event
//! Bus to expose its channel set, which it deliberately doesn't (spec §4.2
//! "no opinion about fan-out").

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;

use crate::dto::EventsSubscribeParams;
use crate::dto::EventsSubscribeToSessionParams;
use crate::error::Result;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::params::parse;
use crate::router::EventStreamJson;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;
use crate::state::AppState;

const ROUTER: &str = "events";
const DEFAULT_REPLAY_LAST: usize = 50;

pub struct EventsRouter {
    state: AppState,
}

impl EventsRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RpcRouter for EventsRouter {
    fn name(&self) -> &'static str {
        ROUTER
    }

    fn security_for(&self, _procedure: &str) -> SecurityLevel {
        SecurityLevel::Public
    }

    async fn subscribe(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<EventStreamJson> {
        match procedure {
            "subscribe" => {
                let p: EventsSubscribeParams = parse(ROUTER, procedure, params)?;
                let stream = self.state.event_bus.subscribe(&p.pattern, p.from_cursor).await;
                Ok(Box::pin(stream.map(|event| serde_json::json!({"id": event.id, "data": event.payload}))))
            }
            "subscribeToSession" => {
                let p: EventsSubscribeToSessionParams = parse(ROUTER, procedure, params)?;
                let replay_last = p.replay_last.unwrap_or(DEFAULT_REPLAY_LAST);
                let stream = self.state.event_bus.subscribe_with_history(&p.session_id, replay_last).await;
                Ok(Box::pin(stream.map(|event| serde_json::json!({"id": event.id, "data": event.payload}))))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }
}

#[cfg(test)]
#[path = "events.test.rs"]
mod tests;
