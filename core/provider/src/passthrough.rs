//! A no-network `Provider` implementation used for integration tests and
//! local development (spec §4.5 Design Notes; SPEC_FULL §4.5
//! "PassthroughProvider").
//!
//! It never performs I/O: `open_completion` echoes the last user text back,
//! word by word, as a deterministic `text-delta` stream, then finishes.
//! This lets `relay-streaming`/`relay-server` integration tests drive a
//! full turn (spec §8 scenarios S1-S4) without a real provider credential.

use async_trait::async_trait;
use futures::stream;
use relay_context::ContentPart;
use relay_context::ModelMessage;
use relay_protocol::ModelInfo;
use relay_protocol::ProviderType;
use relay_protocol::Usage;
use relay_protocol::model::CapabilitySet;
use tokio_util::sync::CancellationToken;

use crate::adapter::CompletionStream;
use crate::adapter::Provider;
use crate::adapter::ProviderConfig;
use crate::error::Result;
use crate::types::CompletionOptions;
use crate::types::ConfigField;
use crate::types::ModelDetails;
use crate::types::ProviderStreamEvent;
use crate::types::ToolSchema;

pub const PASSTHROUGH_MODEL_ID: &str = "passthrough/echo";

/// Builds the single model this provider ever reports.
pub fn passthrough_model() -> ModelInfo {
    ModelInfo {
        id: PASSTHROUGH_MODEL_ID.to_string(),
        provider_id: "passthrough".to_string(),
        provider_type: ProviderType::OpenaiCompat,
        display_name: "Passthrough Echo".to_string(),
        family: PASSTHROUGH_MODEL_ID.to_string(),
        speed_rank: 0,
        input_capabilities: CapabilitySet {
            text: true,
            tools: true,
            ..Default::default()
        },
        output_capabilities: CapabilitySet {
            text: true,
            tools: true,
            ..Default::default()
        },
        max_context: 128_000,
        pricing: None,
        reasoning: relay_protocol::model::ReasoningSupport::No,
        supported_efforts: Vec::new(),
        status: relay_protocol::model::ModelStatus::Active,
        options: Default::default(),
    }
}

#[derive(Debug, Default)]
pub struct PassthroughProvider;

fn last_user_text(prompt: &[ModelMessage]) -> String {
    prompt
        .iter()
        .rev()
        .find(|m| matches!(m.role, relay_protocol::MessageRole::User))
        .map(|m| {
            m.content
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

#[async_trait]
impl Provider for PassthroughProvider {
    fn id(&self) -> &str {
        "passthrough"
    }

    fn name(&self) -> &str {
        "Passthrough"
    }

    fn description(&self) -> &str {
        "Deterministic no-network echo provider for tests and local development."
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        Vec::new()
    }

    fn is_configured(&self, _config: &ProviderConfig) -> bool {
        true
    }

    async fn fetch_models(&self, _config: &ProviderConfig) -> Result<Vec<ModelInfo>> {
        Ok(vec![passthrough_model()])
    }

    async fn model_details(&self, model_id: &str, _config: &ProviderConfig) -> Result<Option<ModelDetails>> {
        if model_id != PASSTHROUGH_MODEL_ID {
            return Ok(None);
        }
        Ok(Some(ModelDetails {
            context_length: 128_000,
            max_output: 8_192,
            input_price_per_million: 0.0,
            output_price_per_million: 0.0,
        }))
    }

    async fn open_completion(
        &self,
        _config: &ProviderConfig,
        _model_id: &str,
        prompt: &[ModelMessage],
        _tools: &[ToolSchema],
        _options: &CompletionOptions,
        _cancel: CancellationToken,
    ) -> Result<CompletionStream> {
        let echoed = last_user_text(prompt);
        let reply = if echoed.is_empty() { "hello".to_string() } else { format!("echo: {echoed}") };
        let words: Vec<String> = reply.split(' ').map(|w| format!("{w} ")).collect();

        let mut events = vec![ProviderStreamEvent::TextStart];
        events.extend(words.into_iter().map(|text| ProviderStreamEvent::TextDelta { text }));
        events.push(ProviderStreamEvent::TextEnd);
        events.push(ProviderStreamEvent::Finish {
            usage: Usage {
                prompt_tokens: echoed.len() as u64,
                completion_tokens: reply.len() as u64,
            },
            finish_reason: "stop".to_string(),
        });

        Ok(Box::pin(stream::iter(events)))
    }
}

#[cfg(test)]
#[path = "passthrough.test.rs"]
mod tests;
