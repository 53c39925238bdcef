use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;
use crate::test_support::EchoTool;
use crate::test_support::FailingTool;
use crate::test_support::SlowTool;

fn registry_with(tool: Arc<dyn crate::tool::Tool>) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(tool);
    Arc::new(registry)
}

#[tokio::test]
async fn successful_execution_measures_duration() {
    let executor = ToolExecutor::new(registry_with(Arc::new(EchoTool::new())));
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let result = executor.execute("echo", serde_json::json!({"text": "hi"}), &ctx, None).await;
    assert!(result.success);
    assert_eq!(result.output.unwrap()["text"], "hi");
}

#[tokio::test]
async fn missing_required_argument_is_rejected_before_running() {
    let executor = ToolExecutor::new(registry_with(Arc::new(EchoTool::new())));
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let result = executor.execute("echo", serde_json::json!({}), &ctx, None).await;
    assert!(!result.success);
    assert_eq!(result.duration_ms, 0);
    assert!(result.error.unwrap().contains("text"));
}

#[tokio::test]
async fn tool_failure_is_reported_with_nonzero_duration() {
    let executor = ToolExecutor::new(registry_with(Arc::new(FailingTool::new())));
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let result = executor.execute("failing", serde_json::json!({}), &ctx, None).await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("boom"));
}

#[tokio::test]
async fn unknown_tool_fails_fast() {
    let executor = ToolExecutor::new(Arc::new(ToolRegistry::new()));
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let result = executor.execute("nope", serde_json::json!({}), &ctx, None).await;
    assert!(!result.success);
    assert_eq!(result.duration_ms, 0);
}

#[tokio::test]
async fn timeout_bounds_a_slow_tool() {
    let executor = ToolExecutor::new(registry_with(Arc::new(SlowTool::new(Duration::from_secs(5)))));
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let result = executor.execute("slow", serde_json::json!({}), &ctx, Some(Duration::from_millis(20))).await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("timed out"));
}
