use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum SessionStoreError {
    #[snafu(display("session {session_id} not found"))]
    SessionNotFound {
        session_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("message {message_id} not found"))]
    MessageNotFound {
        message_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("file content {file_content_id} not found"))]
    FileContentNotFound {
        file_content_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invariant violated: {message}"))]
    InvariantViolated {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("session store write failed: {message}"))]
    StorageFailed {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for SessionStoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound { .. } | Self::MessageNotFound { .. } | Self::FileContentNotFound { .. } => {
                StatusCode::NotFound
            }
            Self::InvariantViolated { .. } => StatusCode::InvariantViolated,
            Self::StorageFailed { .. } => StatusCode::StorageFailed,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, SessionStoreError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
