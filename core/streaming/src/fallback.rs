//! Bounded model-fallback policy (spec §4.8 supplemental), grounded in the
//! teacher's `core/loop::fallback`: if the primary model's stream fails
//! before any content has been emitted with a retryable network/protocol
//! class error, the engine may retry the same turn once against a
//! configured secondary model. This is an internal resilience detail, not
//! a user-visible feature — no additional stream event is emitted beyond
//! the normal error/retry ones, and it is disabled unless a fallback
//! target is configured.

use relay_error::StatusCode;

/// A secondary (provider, model) pair to retry against when the primary
/// model's stream fails before any content was emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTarget {
    pub provider_id: String,
    pub model_id: String,
}

impl FallbackTarget {
    pub fn new(provider_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self { provider_id: provider_id.into(), model_id: model_id.into() }
    }
}

/// Whether a failure's status code is the class the fallback policy reacts
/// to: a transport-level network error, or a malformed/unexpected wire
/// response (`ProviderError::Network`/`ProviderError::Protocol`).
pub fn is_fallback_eligible(status: StatusCode) -> bool {
    matches!(status, StatusCode::NetworkError | StatusCode::ProviderProtocol)
}

#[cfg(test)]
#[path = "fallback.test.rs"]
mod tests;
