use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum EventBusError {
    #[snafu(display("unknown channel {channel}"))]
    UnknownChannel {
        channel: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for EventBusError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownChannel { .. } => StatusCode::NotFound,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, EventBusError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
