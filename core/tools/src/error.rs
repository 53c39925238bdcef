use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ToolError {
    #[snafu(display("unknown tool {tool_id}"))]
    UnknownTool { tool_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("tool {tool_id} arguments failed validation: {message}"))]
    Validation { tool_id: String, message: String, #[snafu(implicit)] location: Location },

    #[snafu(display("tool {tool_id} execution failed: {message}"))]
    Execution { tool_id: String, message: String, #[snafu(implicit)] location: Location },

    #[snafu(display("tool {tool_id} timed out after {timeout_ms}ms"))]
    Timeout { tool_id: String, timeout_ms: u64, #[snafu(implicit)] location: Location },
}

impl ErrorExt for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownTool { .. } => StatusCode::NotFound,
            Self::Validation { .. } => StatusCode::ToolValidation,
            Self::Execution { .. } => StatusCode::ToolExecution,
            Self::Timeout { .. } => StatusCode::Timeout,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
