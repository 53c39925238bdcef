//! Shared test fixtures for this crate's own unit tests.

use async_trait::async_trait;
use relay_protocol::SecurityLevel;
use relay_protocol::ToolCategory;
use relay_protocol::ToolInfo;
use relay_protocol::ToolSource;

use crate::context::ToolContext;
use crate::tool::Tool;

/// A deterministic tool that returns its input unchanged, used across this
/// crate's test modules.
pub struct EchoTool {
    info: ToolInfo,
}

impl EchoTool {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                id: "echo".to_string(),
                name: "Echo".to_string(),
                category: ToolCategory::Other,
                description: "Echoes its input back.".to_string(),
                input_schema: serde_json::json!({
                    "type": "object",
                    "required": ["text"],
                    "properties": { "text": { "type": "string" } }
                }),
                security_level: SecurityLevel::ReadOnly,
                supports_parallel: true,
                enabled_by_default: true,
                source: ToolSource::Builtin,
                supported_by_models: Vec::new(),
                unsupported_by_models: Vec::new(),
            },
        }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    async fn run(&self, args: serde_json::Value, _ctx: &ToolContext) -> Result<serde_json::Value, String> {
        Ok(args)
    }
}

/// A tool that always fails, for exercising the `ToolExecution` path.
pub struct FailingTool {
    info: ToolInfo,
}

impl FailingTool {
    pub fn new() -> Self {
        Self {
            info: ToolInfo {
                id: "failing".to_string(),
                name: "Failing".to_string(),
                category: ToolCategory::Other,
                description: "Always fails.".to_string(),
                input_schema: serde_json::json!({ "type": "object" }),
                security_level: SecurityLevel::ReadOnly,
                supports_parallel: true,
                enabled_by_default: true,
                source: ToolSource::Builtin,
                supported_by_models: Vec::new(),
                unsupported_by_models: Vec::new(),
            },
        }
    }
}

impl Default for FailingTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    async fn run(&self, _args: serde_json::Value, _ctx: &ToolContext) -> Result<serde_json::Value, String> {
        Err("boom".to_string())
    }
}

/// A tool that sleeps longer than any sane per-tool timeout, for exercising
/// the timeout path.
pub struct SlowTool {
    info: ToolInfo,
    pub delay: std::time::Duration,
}

impl SlowTool {
    pub fn new(delay: std::time::Duration) -> Self {
        Self {
            info: ToolInfo {
                id: "slow".to_string(),
                name: "Slow".to_string(),
                category: ToolCategory::Other,
                description: "Sleeps before returning.".to_string(),
                input_schema: serde_json::json!({ "type": "object" }),
                security_level: SecurityLevel::ReadOnly,
                supports_parallel: false,
                enabled_by_default: true,
                source: ToolSource::Builtin,
                supported_by_models: Vec::new(),
                unsupported_by_models: Vec::new(),
            },
            delay,
        }
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn info(&self) -> &ToolInfo {
        &self.info
    }

    async fn run(&self, _args: serde_json::Value, _ctx: &ToolContext) -> Result<serde_json::Value, String> {
        tokio::time::sleep(self.delay).await;
        Ok(serde_json::json!({}))
    }
}
