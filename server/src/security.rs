//! Per-procedure security levels (spec §4.11): `public` procedures are open,
//! `moderate`/`strict` additionally carry caller identity so an external
//! rate limiter can be layered in front of this router — the limiter itself
//! is explicitly out of scope here (spec §1 Non-goals).

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Public,
    Moderate,
    Strict,
}

/// Caller identity threaded through every procedure call. The in-process
/// binding can fill `caller_id` from whatever owns the `RpcRouter`; the
/// HTTP binding fills it from a request header, never invents one.
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    pub caller_id: Option<String>,
}

impl SecurityContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_caller(caller_id: impl Into<String>) -> Self {
        Self { caller_id: Some(caller_id.into()) }
    }

    /// Whether `level` can be served given what we know about the caller.
    /// `moderate`/`strict` only require caller identity to be present —
    /// applying an actual quota is the external limiter's job.
    pub fn satisfies(&self, level: SecurityLevel) -> bool {
        match level {
            SecurityLevel::Public => true,
            SecurityLevel::Moderate | SecurityLevel::Strict => self.caller_id.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "security.test.rs"]
mod tests;
