//! Provider type identification, independent of any concrete SDK.
//!
//! Concrete provider SDKs (OpenAI, Anthropic, OpenRouter, ...) are out of
//! scope for this core; `ProviderType` only exists so the uniform
//! `Provider`/`ModelInfo` surface can record which wire dialect a given
//! provider id resolves to without hardcoding provider ids as strings
//! everywhere.

use serde::Deserialize;
use serde::Serialize;
use strum::Display;

/// The wire dialect a provider adapter speaks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderType {
    Anthropic,
    Openai,
    Gemini,
    Volcengine,
    Zai,
    /// Any OpenAI-compatible HTTP API (the default for unrecognized ids).
    #[default]
    OpenaiCompat,
}

#[cfg(test)]
#[path = "provider_type.test.rs"]
mod tests;
