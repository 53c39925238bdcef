//! The RPC layer's unified error type (spec §4.11, §6 `{error: {code,
//! message}}`): every core error a procedure can surface, plus the
//! transport-level failures (unknown router/procedure, bad params) that
//! only exist at this boundary.

use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum RpcError {
    #[snafu(display("unknown router {router}"))]
    UnknownRouter { router: String, #[snafu(implicit)] location: Location },

    #[snafu(display("{router} has no procedure {procedure}"))]
    UnknownProcedure { router: String, procedure: String, #[snafu(implicit)] location: Location },

    #[snafu(display("invalid params for {router}.{procedure}: {message}"))]
    InvalidParams { router: String, procedure: String, message: String, #[snafu(implicit)] location: Location },

    #[snafu(display("session {session_id} not found"))]
    SessionNotFound { session_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("session store failed: {source}"))]
    SessionStore { source: relay_session_store::SessionStoreError, #[snafu(implicit)] location: Location },

    #[snafu(display("streaming engine failed: {source}"))]
    Streaming { source: relay_streaming::StreamingError, #[snafu(implicit)] location: Location },

    #[snafu(display("compaction failed: {source}"))]
    Compaction { source: relay_compaction::CompactionError, #[snafu(implicit)] location: Location },

    #[snafu(display("model registry lookup failed: {source}"))]
    ModelRegistry { source: relay_model_registry::ModelRegistryError, #[snafu(implicit)] location: Location },

    #[snafu(display("provider failed: {source}"))]
    Provider { source: relay_provider::ProviderError, #[snafu(implicit)] location: Location },

    #[snafu(display("config failed: {source}"))]
    Config { source: relay_config::ConfigError, #[snafu(implicit)] location: Location },
}

impl ErrorExt for RpcError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownRouter { .. } => StatusCode::NotFound,
            Self::UnknownProcedure { .. } => StatusCode::Unsupported,
            Self::InvalidParams { .. } => StatusCode::InvalidArguments,
            Self::SessionNotFound { .. } => StatusCode::NotFound,
            Self::SessionStore { source, .. } => source.status_code(),
            Self::Streaming { source, .. } => source.status_code(),
            Self::Compaction { source, .. } => source.status_code(),
            Self::ModelRegistry { source, .. } => source.status_code(),
            Self::Provider { source, .. } => source.status_code(),
            Self::Config { source, .. } => source.status_code(),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
