//! Error types for configuration loading and persistence.

use relay_error::ErrorExt;
use relay_error::Location;
use relay_error::StatusCode;
use relay_error::stack_trace_debug;
use snafu::Snafu;

#[stack_trace_debug]
#[derive(Snafu)]
#[snafu(visibility(pub(crate)), module)]
pub enum ConfigError {
    #[snafu(display("config directory could not be determined"))]
    HomeDirNotFound {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to read config file {path}"))]
    Read {
        path: String,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to write config file {path}"))]
    Write {
        path: String,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid JSON in {path}: {source}"))]
    InvalidJson {
        path: String,
        source: serde_json::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid config syntax in {path}: {message}"))]
    Parse {
        path: String,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("provider not found: {provider_id}"))]
    ProviderNotFound {
        provider_id: String,
        #[snafu(implicit)]
        location: Location,
    },
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::HomeDirNotFound { .. } => StatusCode::InvalidConfig,
            Self::Read { .. } | Self::Write { .. } => StatusCode::ConfigFileError,
            Self::InvalidJson { .. } => StatusCode::InvalidJson,
            Self::Parse { .. } => StatusCode::ParseError,
            Self::ProviderNotFound { .. } => StatusCode::ProviderNotFound,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
