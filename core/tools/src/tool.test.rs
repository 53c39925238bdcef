use tokio_util::sync::CancellationToken;

use super::*;
use crate::test_support::EchoTool;

#[tokio::test]
async fn echo_tool_returns_its_input() {
    let tool = EchoTool::new();
    let ctx = ToolContext::new("s1", "c1", CancellationToken::new());
    let out = tool.run(serde_json::json!({"text": "hi"}), &ctx).await.unwrap();
    assert_eq!(out["text"], "hi");
}
