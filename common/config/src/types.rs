//! On-disk shape of `AIConfig` (spec §6 Configuration).

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Per-provider credentials and defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// The single source of configuration truth for the server (spec §6).
///
/// Loaded from a well-known file at startup and on demand; saved atomically
/// on mutation. Credentials are stored exactly as given — encryption, if
/// wanted, is the caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_agent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_enabled_rule_ids: Option<Vec<String>>,
}

impl AiConfig {
    pub fn provider(&self, provider_id: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider_id)
    }
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;
