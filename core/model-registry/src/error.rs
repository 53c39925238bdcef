use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ModelRegistryError {
    #[snafu(display("unknown provider {provider_id}"))]
    UnknownProvider { provider_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("unknown model {model_id}"))]
    UnknownModel { model_id: String, #[snafu(implicit)] location: Location },

    #[snafu(display("no models in family {family} for provider {provider_id}"))]
    UnknownFamily { provider_id: String, family: String, #[snafu(implicit)] location: Location },

    #[snafu(display("dynamic capability fetch for provider {provider_id} failed: {message}"))]
    CapabilityFetchFailed { provider_id: String, message: String, #[snafu(implicit)] location: Location },
}

impl ErrorExt for ModelRegistryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownProvider { .. } => StatusCode::ProviderNotFound,
            Self::UnknownModel { .. } => StatusCode::ModelNotFound,
            Self::UnknownFamily { .. } => StatusCode::ModelNotFound,
            Self::CapabilityFetchFailed { .. } => StatusCode::NetworkError,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ModelRegistryError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
