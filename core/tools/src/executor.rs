//! Validates arguments and runs a tool, measuring wall-clock duration
//! (spec §4.6 `executeTool`).
//!
//! Tool call duration must never be hard-coded to zero (SPEC_FULL §4.6,
//! Design Notes open question #2): every path below stamps
//! `duration_ms` from an `Instant` taken immediately before the tool runs
//! (or, for a validation failure, `0` per spec — nothing ran).

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use relay_protocol::ToolExecutionResult;
use tracing::warn;

use crate::context::ToolContext;
use crate::registry::ToolRegistry;

/// Shallow structural check: every name in the schema's top-level
/// `required` array must be present as a key in `args`. This core does not
/// carry a full JSON Schema validator (spec §4.6 leaves tool argument
/// shapes to the concrete tool; this is the minimum the registry contract
/// needs to reject an obviously wrong call before spending an execution).
fn missing_required_fields(schema: &serde_json::Value, args: &serde_json::Value) -> Vec<String> {
    let Some(required) = schema.get("required").and_then(|r| r.as_array()) else {
        return Vec::new();
    };
    let object = args.as_object();
    required
        .iter()
        .filter_map(|name| name.as_str())
        .filter(|name| !object.is_some_and(|o| o.contains_key(*name)))
        .map(str::to_string)
        .collect()
}

/// Runs tools on behalf of the Streaming Engine.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Executes `tool_id` with `args`. Validation failures return
    /// `success=false` with `duration_ms=0` without invoking the tool
    /// (spec §4.6 Failure). A `timeout` bounds the tool's own execution
    /// only, not validation.
    pub async fn execute(
        &self,
        tool_id: &str,
        args: serde_json::Value,
        ctx: &ToolContext,
        timeout: Option<Duration>,
    ) -> ToolExecutionResult {
        let tool = match self.registry.get(tool_id) {
            Ok(tool) => tool,
            Err(err) => return ToolExecutionResult::failure(err.to_string()),
        };

        let missing = missing_required_fields(&tool.info().input_schema, &args);
        if !missing.is_empty() {
            return ToolExecutionResult::failure(format!(
                "missing required argument(s): {}",
                missing.join(", ")
            ));
        }

        let start = Instant::now();
        let outcome = match timeout {
            Some(bound) => match tokio::time::timeout(bound, tool.run(args, ctx)).await {
                Ok(result) => result,
                Err(_) => {
                    let duration_ms = start.elapsed().as_millis() as u64;
                    warn!(tool_id, timeout_ms = bound.as_millis() as u64, "tool execution timed out");
                    return ToolExecutionResult {
                        success: false,
                        output: None,
                        error: Some(format!("tool {tool_id} timed out after {}ms", bound.as_millis())),
                        duration_ms,
                    };
                }
            },
            None => tool.run(args, ctx).await,
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) => ToolExecutionResult::success(output, duration_ms),
            Err(error) => ToolExecutionResult {
                success: false,
                output: None,
                error: Some(error),
                duration_ms,
            },
        }
    }
}

#[cfg(test)]
#[path = "executor.test.rs"]
mod tests;
