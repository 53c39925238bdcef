use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ProviderError {
    #[snafu(display("unknown provider {provider_id}"))]
    UnknownProvider { provider_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("provider {provider_id} is not configured"))]
    NotConfigured { provider_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("unknown model {model_id} for provider {provider_id}"))]
    UnknownModel { provider_id: String, model_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("provider {provider_id} network error: {message}"))]
    Network { provider_id: String, message: String, #[snafu(implicit)] location: Location },

    #[snafu(display("provider {provider_id} returned a protocol error: {message}"))]
    Protocol { provider_id: String, message: String, #[snafu(implicit)] location: Location },
}

impl ErrorExt for ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownProvider { .. } => StatusCode::ProviderNotFound,
            Self::NotConfigured { .. } => StatusCode::InvalidConfig,
            Self::UnknownModel { .. } => StatusCode::ModelNotFound,
            Self::Network { .. } => StatusCode::NetworkError,
            Self::Protocol { .. } => StatusCode::ProviderProtocol,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
