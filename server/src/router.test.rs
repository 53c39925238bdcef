use async_trait::async_trait;

use super::*;

struct QueryOnlyRouter;

#[async_trait]
impl RpcRouter for QueryOnlyRouter {
    fn name(&self) -> &'static str {
        "query_only"
    }

    fn security_for(&self, _procedure: &str) -> SecurityLevel {
        SecurityLevel::Public
    }

    async fn call(&self, _procedure: &str, _params: Value, _ctx: &SecurityContext) -> Result<Value> {
        Ok(serde_json::json!({"ok": true}))
    }
}

#[tokio::test]
async fn unhandled_call_reports_unknown_procedure() {
    struct SubscribeOnlyRouter;
    #[async_trait]
    impl RpcRouter for SubscribeOnlyRouter {
        fn name(&self) -> &'static str {
            "subscribe_only"
        }
        fn security_for(&self, _procedure: &str) -> SecurityLevel {
            SecurityLevel::Public
        }
    }

    let router = SubscribeOnlyRouter;
    let err = router.call("anything", Value::Null, &SecurityContext::anonymous()).await.expect_err("call has no override");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}

#[tokio::test]
async fn unhandled_subscribe_reports_unknown_procedure() {
    let router = QueryOnlyRouter;
    let err = router.subscribe("anything", Value::Null, &SecurityContext::anonymous()).await.expect_err("subscribe has no override");
    assert!(matches!(err, crate::error::RpcError::UnknownProcedure { .. }));
}

#[tokio::test]
async fn overridden_call_runs() {
    let router = QueryOnlyRouter;
    let result = router.call("noop", Value::Null, &SecurityContext::anonymous()).await.unwrap();
    assert_eq!(result, serde_json::json!({"ok": true}));
}
