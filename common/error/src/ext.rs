//! Extension trait implemented by every error enum in the workspace, plus a
//! couple of small concrete error types used by crates that don't need a
//! full `snafu` enum of their own.

use std::any::Any;
use std::error::Error;
use std::fmt;

use crate::StatusCode;

/// Behavior every domain error in the workspace is expected to provide on
/// top of `std::error::Error`.
pub trait ErrorExt: std::error::Error {
    /// The status code this error maps to.
    fn status_code(&self) -> StatusCode;

    /// Whether the operation that produced this error is safe to retry.
    ///
    /// Defaults to the code's own classification; override when a
    /// particular variant needs to disagree with its code's default (for
    /// example, a `NetworkError` raised after exhausting the retry budget).
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Whether this error is worth a `tracing::error!` at the point it's
    /// handled, as opposed to being expected, user-caused noise.
    fn should_log_error(&self) -> bool {
        self.status_code().should_log_error()
    }

    /// The message safe to hand back to a caller (API response, CLI
    /// output). Internal-category errors collapse to a generic message plus
    /// the status code so operators can grep logs without leaking detail;
    /// everything else passes through its own `Display`.
    fn output_msg(&self) -> String {
        match self.status_code() {
            StatusCode::Internal | StatusCode::Unknown => {
                format!("Internal error: {}", self.status_code() as i32)
            }
            _ => self.to_string(),
        }
    }

    /// Upcast for downstream `downcast_ref` on trait objects.
    fn as_any(&self) -> &dyn Any;
}

/// A minimal concrete error carrying just a message and a [`StatusCode`].
///
/// Used by crates and tests that need to construct an error value without
/// defining a dedicated `snafu` enum — e.g. wrapping a one-off validation
/// failure at a boundary that doesn't otherwise produce errors.
#[derive(Debug, Clone)]
pub struct PlainError {
    message: String,
    status_code: StatusCode,
}

impl PlainError {
    pub fn new(message: impl Into<String>, status_code: StatusCode) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }
}

impl fmt::Display for PlainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PlainError {}

impl ErrorExt for PlainError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A foreign error (`std::io::Error`, `reqwest::Error`, ...) tagged with a
/// [`StatusCode`] so it can flow through the same `ErrorExt` machinery as a
/// `snafu` enum without the caller needing to define a wrapper variant.
#[derive(Debug)]
pub struct BoxedError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
    status_code: StatusCode,
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for BoxedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl ErrorExt for BoxedError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wrap a foreign error with a [`StatusCode`], producing a [`BoxedError`].
pub fn boxed(
    err: impl std::error::Error + Send + Sync + 'static,
    status_code: StatusCode,
) -> BoxedError {
    BoxedError {
        source: Box::new(err),
        status_code,
    }
}

#[cfg(test)]
#[path = "ext.test.rs"]
mod tests;
