use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum EventLogError {
    #[snafu(display("event log write to channel {channel} failed after retries: {message}"))]
    StorageFailed {
        channel: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("event log io error: {message}"))]
    Io {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("malformed event record: {message}"))]
    Corrupt {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for EventLogError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::StorageFailed { .. } => StatusCode::StorageFailed,
            Self::Io { .. } => StatusCode::IoError,
            Self::Corrupt { .. } => StatusCode::ParseError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, EventLogError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
