use async_trait::async_trait;

use super::*;
use crate::error::RpcError;

struct EchoRouter;

#[async_trait]
impl RpcRouter for EchoRouter {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn security_for(&self, _procedure: &str) -> SecurityLevel {
        SecurityLevel::Public
    }

    async fn call(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<Value> {
        Ok(serde_json::json!({"procedure": procedure, "params": params}))
    }
}

#[test]
fn split_name_splits_on_first_dot() {
    assert_eq!(split_name("session.create"), Some(("session", "create")));
    assert_eq!(split_name("events.subscribeToSession"), Some(("events", "subscribeToSession")));
    assert_eq!(split_name("noroute"), None);
}

#[tokio::test]
async fn dispatches_to_the_matching_router() {
    let dispatcher = RpcDispatcher::new(vec![Arc::new(EchoRouter)]);
    let result = dispatcher.call("echo", "ping", Value::Null, &SecurityContext::anonymous()).await.unwrap();
    assert_eq!(result, serde_json::json!({"procedure": "ping", "params": Value::Null}));
}

#[tokio::test]
async fn unknown_router_is_reported() {
    let dispatcher = RpcDispatcher::new(vec![Arc::new(EchoRouter)]);
    let err = dispatcher.call("bogus", "ping", Value::Null, &SecurityContext::anonymous()).await.expect_err("router does not exist");
    assert!(matches!(err, RpcError::UnknownRouter { .. }));
}
