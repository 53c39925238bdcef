use std::sync::Arc;

use relay_error::ErrorExt;
use relay_protocol::ToolCategory;

use super::*;
use crate::test_support::EchoTool;

#[test]
fn register_then_get_round_trips() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(EchoTool::new()));
    let tool = registry.get("echo").unwrap();
    assert_eq!(tool.info().id, "echo");
}

#[test]
fn unknown_tool_is_not_found() {
    let registry = ToolRegistry::new();
    let err = registry.get("nope").unwrap_err();
    assert_eq!(err.status_code(), relay_error::StatusCode::NotFound);
}

#[test]
fn by_category_filters() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(EchoTool::new()));
    assert_eq!(registry.by_category(ToolCategory::Other).len(), 1);
    assert_eq!(registry.by_category(ToolCategory::Execution).len(), 0);
}

#[test]
fn available_for_model_honors_default_enablement() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(EchoTool::new()));
    assert_eq!(registry.available_for_model("any-model").len(), 1);
}
