use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::types::ConfigField;

struct FakeProvider;

#[async_trait]
impl Provider for FakeProvider {
    fn id(&self) -> &str {
        "fake"
    }

    fn name(&self) -> &str {
        "Fake"
    }

    fn description(&self) -> &str {
        "test double"
    }

    fn config_schema(&self) -> Vec<ConfigField> {
        vec![ConfigField::new("api_key", "API Key", true).secret()]
    }

    async fn fetch_models(&self, _config: &ProviderConfig) -> Result<Vec<ModelInfo>> {
        Ok(Vec::new())
    }

    async fn model_details(&self, _model_id: &str, _config: &ProviderConfig) -> Result<Option<ModelDetails>> {
        Ok(None)
    }

    async fn open_completion(
        &self,
        _config: &ProviderConfig,
        _model_id: &str,
        _prompt: &[relay_context::ModelMessage],
        _tools: &[ToolSchema],
        _options: &CompletionOptions,
        _cancel: CancellationToken,
    ) -> Result<CompletionStream> {
        Ok(Box::pin(futures::stream::empty()))
    }
}

#[test]
fn default_is_configured_checks_required_fields() {
    let provider = FakeProvider;
    assert!(!provider.is_configured(&ProviderConfig::new()));

    let mut config = ProviderConfig::new();
    config.insert("api_key".to_string(), "secret".to_string());
    assert!(provider.is_configured(&config));
}
