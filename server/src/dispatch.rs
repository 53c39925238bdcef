//! Binds a `<router>.<procedure>` name (spec §4.11) to one of the
//! registered [`RpcRouter`]s and dispatches into it. Both transports share
//! this: it is the in-process binding, and the HTTP binding is a thin layer
//! on top of it.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::error::rpc_error::UnknownRouterSnafu;
use crate::router::EventStreamJson;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;

/// Splits `"session.create"` into `("session", "create")`. The procedure
/// name may itself contain dots (spec §4.11 names are simple identifiers in
/// practice, but the split only ever consumes the first one).
pub fn split_name(name: &str) -> Option<(&str, &str)> {
    name.split_once('.')
}

pub struct RpcDispatcher {
    routers: HashMap<&'static str, Arc<dyn RpcRouter>>,
}

impl RpcDispatcher {
    pub fn new(routers: Vec<Arc<dyn RpcRouter>>) -> Self {
        Self { routers: routers.into_iter().map(|r| (r.name(), r)).collect() }
    }

    fn resolve(&self, router_name: &str) -> Result<&Arc<dyn RpcRouter>> {
        self.routers.get(router_name).ok_or_else(|| UnknownRouterSnafu { router: router_name.to_string() }.build())
    }

    pub fn security_for(&self, router_name: &str, procedure: &str) -> Result<SecurityLevel> {
        Ok(self.resolve(router_name)?.security_for(procedure))
    }

    pub async fn call(&self, router_name: &str, procedure: &str, params: Value, ctx: &SecurityContext) -> Result<Value> {
        self.resolve(router_name)?.call(procedure, params, ctx).await
    }

    pub async fn subscribe(&self, router_name: &str, procedure: &str, params: Value, ctx: &SecurityContext) -> Result<EventStreamJson> {
        self.resolve(router_name)?.subscribe(procedure, params, ctx).await
    }
}

#[cfg(test)]
#[path = "dispatch.test.rs"]
mod tests;
