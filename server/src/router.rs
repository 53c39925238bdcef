//! The `RpcRouter` trait (spec §4.11): one implementation per named router
//! (`session`, `message`, `events`, `config`, `todo`). Both transports — the
//! in-process trait object and the HTTP binding — dispatch through this
//! same surface, so adding a procedure never touches the HTTP layer.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde_json::Value;

use crate::error::Result;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;

/// A subscription's wire-level event stream: already-serialized JSON, ready
/// to frame as SSE or hand back across an in-process channel.
pub type EventStreamJson = Pin<Box<dyn Stream<Item = Value> + Send>>;

#[async_trait]
pub trait RpcRouter: Send + Sync {
    /// The router's name, e.g. `"session"` — the part of `<router>.<procedure>`
    /// before the dot (spec §4.11).
    fn name(&self) -> &'static str;

    /// The declared security level for `procedure`, used by the HTTP layer
    /// to decide whether a caller identity is required before dispatch.
    fn security_for(&self, procedure: &str) -> SecurityLevel;

    /// Handles a `query`/`mutation` procedure. Routers that only expose
    /// subscriptions (e.g. `events`) leave this at its default.
    async fn call(&self, procedure: &str, params: Value, ctx: &SecurityContext) -> Result<Value> {
        let _ = (params, ctx);
        Err(UnknownProcedureSnafu { router: self.name().to_string(), procedure: procedure.to_string() }.build())
    }

    /// Handles a `subscription` procedure. Routers that only expose
    /// queries/mutations leave this at its default.
    async fn subscribe(&self, procedure: &str, params: Value, ctx: &SecurityContext) -> Result<EventStreamJson> {
        let _ = (params, ctx);
        Err(UnknownProcedureSnafu { router: self.name().to_string(), procedure: procedure.to_string() }.build())
    }
}

#[cfg(test)]
#[path = "router.test.rs"]
mod tests;
