use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn report_progress_without_a_sender_is_a_no_op() {
    let ctx = ToolContext::new("session-1", "call-1", CancellationToken::new());
    ctx.report_progress("working", None);
}

#[tokio::test]
async fn report_progress_reaches_the_sender() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let ctx = ToolContext::new("session-1", "call-1", CancellationToken::new()).with_progress_sender(tx);
    ctx.report_progress("halfway", Some(serde_json::json!({"pct": 50})));
    let progress = rx.recv().await.unwrap();
    assert_eq!(progress.message, "halfway");
}
