//! Errors raised while building environment/context/prompt values.

use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ContextError {
    #[snafu(display("context budget exceeded: {message}"))]
    BudgetExceeded {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid context configuration: {message}"))]
    InvalidConfig {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to build value: {message}"))]
    Build {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("referenced file content {file_content_id} was not found"))]
    FileContentMissing {
        file_content_id: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ContextError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BudgetExceeded { .. } => StatusCode::InvalidArguments,
            Self::InvalidConfig { .. } => StatusCode::InvalidConfig,
            Self::Build { .. } => StatusCode::Internal,
            Self::FileContentMissing { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
