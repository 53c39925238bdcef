use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum StreamingError {
    #[snafu(display("session {session_id} not found"))]
    SessionNotFound {
        session_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("a stream is already active on session {session_id}"))]
    SessionBusy {
        session_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("unknown provider {provider_id}"))]
    UnknownProvider {
        provider_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("session store failed: {source}"))]
    Store {
        source: relay_session_store::SessionStoreError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("context assembly failed: {source}"))]
    Context {
        source: relay_context::ContextError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("model registry lookup failed: {source}"))]
    ModelRegistry {
        source: relay_model_registry::ModelRegistryError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("provider failed: {source}"))]
    Provider {
        source: relay_provider::ProviderError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for StreamingError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SessionNotFound { .. } => StatusCode::NotFound,
            Self::SessionBusy { .. } => StatusCode::SessionBusy,
            Self::UnknownProvider { .. } => StatusCode::ProviderNotFound,
            Self::Store { source, .. } => source.status_code(),
            Self::Context { source, .. } => source.status_code(),
            Self::ModelRegistry { source, .. } => source.status_code(),
            Self::Provider { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, StreamingError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
