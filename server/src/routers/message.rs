//! The `message` router (spec §4.11): starts a turn and streams its events.
//! `triggerStream` is a mutation returning `{ sessionId }` immediately
//! (spec §4.8 "front door"); `subscribe` is the long-lived companion that
//! actually delivers the turn's `StreamEvent`s.

use async_trait::async_trait;
use futures::StreamExt;
use relay_streaming::TriggerStreamInput;
use serde_json::Value;
use snafu::ResultExt;

use crate::dto::MessageSubscribeParams;
use crate::dto::SessionIdResult;
use crate::dto::TriggerStreamParams;
use crate::error::Result;
use crate::error::rpc_error::StreamingSnafu;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::params::parse;
use crate::router::EventStreamJson;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;
use crate::state::AppState;

const ROUTER: &str = "message";
const DEFAULT_REPLAY_LAST: usize = 50;

pub struct MessageRouter {
    state: AppState,
}

impl MessageRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RpcRouter for MessageRouter {
    fn name(&self) -> &'static str {
        ROUTER
    }

    fn security_for(&self, procedure: &str) -> SecurityLevel {
        match procedure {
            "triggerStream" => SecurityLevel::Moderate,
            _ => SecurityLevel::Public,
        }
    }

    async fn call(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<Value> {
        match procedure {
            "triggerStream" => {
                let p: TriggerStreamParams = parse(ROUTER, procedure, params)?;
                let input = TriggerStreamInput {
                    session_id: p.session_id,
                    provider_id: p.provider,
                    model_id: p.model,
                    agent_id: p.agent_id,
                    enabled_rule_ids: p.enabled_rule_ids,
                    content: p.content,
                    resource_snapshot: p.resource_snapshot,
                };
                let output = self.state.engine.trigger_stream(input).await.context(StreamingSnafu)?;
                Ok(serde_json::to_value(SessionIdResult { session_id: output.session_id }).expect("serializable"))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }

    async fn subscribe(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<EventStreamJson> {
        match procedure {
            "subscribe" => {
                let p: MessageSubscribeParams = parse(ROUTER, procedure, params)?;
                let replay_last = p.replay_last.unwrap_or(DEFAULT_REPLAY_LAST);
                let stream = self.state.engine.subscribe(&p.session_id, replay_last).await;
                Ok(Box::pin(stream.map(|event| serde_json::json!({"id": event.id, "data": event.payload}))))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }
}

#[cfg(test)]
#[path = "message.test.rs"]
mod tests;
