//! The uniform `Provider` capability surface (spec §4.5).
//!
//! Concrete provider SDKs (OpenAI, Anthropic, OpenRouter, ...) are out of
//! scope for this core (spec §1); this module defines the trait every such
//! adapter would implement, so the Streaming Engine never depends on a
//! concrete wire format.

use std::collections::HashMap;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use relay_protocol::ModelInfo;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::types::CompletionOptions;
use crate::types::ConfigField;
use crate::types::ModelDetails;
use crate::types::ProviderStreamEvent;
use crate::types::ToolSchema;

pub type CompletionStream = Pin<Box<dyn Stream<Item = ProviderStreamEvent> + Send>>;

/// Per-provider credentials and overrides, as resolved from `AIConfig`.
pub type ProviderConfig = HashMap<String, String>;

/// The uniform interface the core sees for an LLM provider (spec §4.5).
///
/// Grounded in the teacher's `Provider` trait (`hyper-sdk::provider`):
/// `name`/`model`/`list_models` generalized here into an async,
/// config-parameterized surface plus the streaming completion the core
/// actually drives.
#[async_trait]
pub trait Provider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn config_schema(&self) -> Vec<ConfigField>;

    /// Whether `config` carries everything `config_schema` marks required.
    fn is_configured(&self, config: &ProviderConfig) -> bool {
        self.config_schema().iter().filter(|f| f.required).all(|f| config.contains_key(&f.key))
    }

    /// Enumerates this provider's models, TTL-cached per `(provider,
    /// apiKey)` by the caller (spec §4.5: 1 hour, retried on network error).
    async fn fetch_models(&self, config: &ProviderConfig) -> Result<Vec<ModelInfo>>;

    /// Live model metadata, or `None` if the provider has no such model.
    async fn model_details(&self, model_id: &str, config: &ProviderConfig) -> Result<Option<ModelDetails>>;

    /// Opens a streaming completion. `cancel` must be honored promptly: the
    /// returned stream ends within the bound described in spec §5
    /// Cancellation once `cancel` fires.
    async fn open_completion(
        &self,
        config: &ProviderConfig,
        model_id: &str,
        prompt: &[relay_context::ModelMessage],
        tools: &[ToolSchema],
        options: &CompletionOptions,
        cancel: CancellationToken,
    ) -> Result<CompletionStream>;
}

#[cfg(test)]
#[path = "adapter.test.rs"]
mod tests;
