use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum CompactionError {
    #[snafu(display("session {session_id} not found"))]
    SessionNotFound {
        session_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("session {session_id} has no messages to compact"))]
    EmptySession {
        session_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("summarization provider produced no content"))]
    EmptySummary {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("session store failed during compaction: {source}"))]
    Store {
        source: relay_session_store::SessionStoreError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("provider failed during compaction: {source}"))]
    Provider {
        source: relay_provider::ProviderError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for CompactionError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound { .. } => StatusCode::NotFound,
            Self::EmptySession { .. } => StatusCode::InvalidArguments,
            Self::EmptySummary { .. } => StatusCode::ProviderProtocol,
            Self::Store { source, .. } => source.status_code(),
            Self::Provider { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, CompactionError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
