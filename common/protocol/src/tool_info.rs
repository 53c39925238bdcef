//! Tool registry contract (spec §4.6).

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    FileSystem,
    Execution,
    Search,
    Network,
    Planning,
    Other,
}

/// The trust tier a tool executes under; higher tiers gate on confirmation
/// or sandboxing upstream of the Tool Executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    ReadOnly,
    Write,
    Execute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    Builtin,
    Mcp,
    Plugin,
}

/// A registry entry describing one callable tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub id: String,
    pub name: String,
    pub category: ToolCategory,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub security_level: SecurityLevel,
    pub supports_parallel: bool,
    pub enabled_by_default: bool,
    pub source: ToolSource,
    #[serde(default)]
    pub supported_by_models: Vec<String>,
    #[serde(default)]
    pub unsupported_by_models: Vec<String>,
}

impl ToolInfo {
    /// Whether this tool may be offered to the given model id, honoring
    /// both allow- and deny-lists (deny takes precedence when both are set).
    pub fn compatible_with_model(&self, model_id: &str) -> bool {
        if self.unsupported_by_models.iter().any(|m| m == model_id) {
            return false;
        }
        if self.supported_by_models.is_empty() {
            return true;
        }
        self.supported_by_models.iter().any(|m| m == model_id)
    }
}

/// The outcome of a single tool invocation (spec §4.6 `executeTool`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ToolExecutionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
            duration_ms: 0,
        }
    }

    pub fn success(output: serde_json::Value, duration_ms: u64) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
            duration_ms,
        }
    }
}

#[cfg(test)]
#[path = "tool_info.test.rs"]
mod tests;
