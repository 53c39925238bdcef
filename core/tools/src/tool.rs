//! The callable-tool contract (spec §4.6).

use async_trait::async_trait;
use relay_protocol::ToolInfo;

use crate::context::ToolContext;

/// One callable tool. Implementations may be synchronous or suspending;
/// the registry only ever holds `Arc<dyn Tool>` (spec §5: "tool-registry is
/// effectively immutable after initialization").
///
/// Concrete tool implementations (filesystem, shell, search) are out of
/// scope for this core (spec §1); this trait is the seam a host process
/// implements them behind.
#[async_trait]
pub trait Tool: Send + Sync {
    fn info(&self) -> &ToolInfo;

    /// Runs the tool. Returning `Err` is an execution failure
    /// (`StatusCode::ToolExecution`); argument-shape problems should be
    /// caught by [`crate::executor::ToolExecutor::execute`]'s schema check
    /// before `run` is even called.
    async fn run(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String>;
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
