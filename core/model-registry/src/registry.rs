//! Static provider/model catalog plus TTL-cached dynamic capability queries
//! (spec §4.4).

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::time::Duration;

use relay_cache::TtlCache;
use relay_protocol::Capability;
use relay_protocol::ModelInfo;
use relay_protocol::ProviderType;
use relay_protocol::ReasoningEffort;

use crate::error::Result;
use crate::error::model_registry_error::UnknownFamilySnafu;
use crate::error::model_registry_error::UnknownModelSnafu;
use crate::error::model_registry_error::UnknownProviderSnafu;

/// A named group of sibling model variants sharing a `family_id` (spec
/// §4.4 supplemental: "resolve the fast model for this provider without
/// hardcoding ids"), grounded in the teacher's
/// `models_manager::model_family_registry` grouping concept.
#[derive(Debug, Clone)]
pub struct ModelFamily<'a> {
    pub family_id: String,
    pub models: Vec<&'a ModelInfo>,
}

impl<'a> ModelFamily<'a> {
    /// The lowest `speed_rank` variant in the family, i.e. the fast one.
    pub fn fastest(&self) -> Option<&'a ModelInfo> {
        self.models.iter().min_by_key(|m| m.speed_rank).copied()
    }

    /// The highest `speed_rank` variant in the family, i.e. the most capable.
    pub fn most_capable(&self) -> Option<&'a ModelInfo> {
        self.models.iter().max_by_key(|m| m.speed_rank).copied()
    }
}

/// One entry in the static provider catalog.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEntry {
    pub id: String,
    pub name: String,
    pub provider_type: ProviderType,
}

const DYNAMIC_CAPABILITY_CACHE_SIZE: usize = 256;
const DYNAMIC_CAPABILITY_TTL: Duration = Duration::from_secs(60 * 60);

/// A cache key for dynamic, per-credential capability queries (spec §4.4:
/// "keyed by (provider, apiKey-prefix)").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityCacheKey {
    pub provider_id: String,
    pub api_key_prefix: String,
}

impl CapabilityCacheKey {
    pub fn new(provider_id: impl Into<String>, api_key: &str) -> Self {
        let prefix_len = api_key.len().min(8);
        Self { provider_id: provider_id.into(), api_key_prefix: api_key[..prefix_len].to_string() }
    }
}

impl From<&CapabilityCacheKey> for CapabilityCacheKey {
    fn from(key: &CapabilityCacheKey) -> Self {
        key.clone()
    }
}

/// The static catalog of providers and models, with dynamic capability
/// queries layered on top behind a one-hour TTL cache.
pub struct ModelRegistry {
    providers: Vec<ProviderEntry>,
    models: HashMap<String, ModelInfo>,
    dynamic_capabilities: TtlCache<CapabilityCacheKey, serde_json::Value>,
}

impl ModelRegistry {
    pub fn new(providers: Vec<ProviderEntry>, models: Vec<ModelInfo>) -> Self {
        Self {
            providers,
            models: models.into_iter().map(|m| (m.id.clone(), m)).collect(),
            dynamic_capabilities: TtlCache::new(
                NonZeroUsize::new(DYNAMIC_CAPABILITY_CACHE_SIZE).expect("non-zero capacity"),
                DYNAMIC_CAPABILITY_TTL,
            ),
        }
    }

    pub fn get_all_providers(&self) -> &[ProviderEntry] {
        &self.providers
    }

    pub fn get_all_models(&self) -> Vec<&ModelInfo> {
        self.models.values().collect()
    }

    pub fn get_model(&self, model_id: &str) -> Result<&ModelInfo> {
        self.models.get(model_id).ok_or_else(|| UnknownModelSnafu { model_id: model_id.to_string() }.build())
    }

    pub fn get_models_by_provider(&self, provider_id: &str) -> Vec<&ModelInfo> {
        self.models.values().filter(|m| m.provider_id == provider_id).collect()
    }

    pub fn get_provider(&self, provider_id: &str) -> Result<&ProviderEntry> {
        self.providers
            .iter()
            .find(|p| p.id == provider_id)
            .ok_or_else(|| UnknownProviderSnafu { provider_id: provider_id.to_string() }.build())
    }

    pub fn model_supports_input(&self, model_id: &str, capability: Capability) -> Result<bool> {
        Ok(self.get_model(model_id)?.supports_input(capability))
    }

    pub fn model_supports_output(&self, model_id: &str, capability: Capability) -> Result<bool> {
        Ok(self.get_model(model_id)?.supports_output(capability))
    }

    /// Registers or replaces a model in the catalog, e.g. after a provider's
    /// static catalog is refreshed at startup.
    pub fn upsert_model(&mut self, model: ModelInfo) {
        self.models.insert(model.id.clone(), model);
    }

    /// Groups every model for `provider_id` sharing `family_id` (spec §4.4
    /// supplemental).
    pub fn get_family(&self, provider_id: &str, family_id: &str) -> ModelFamily<'_> {
        let models = self.models.values().filter(|m| m.provider_id == provider_id && m.family_id() == family_id).collect();
        ModelFamily { family_id: family_id.to_string(), models }
    }

    /// The fastest model in `family_id` for `provider_id`, used to resolve
    /// "the fast model for this provider" without hardcoding a model id.
    pub fn fastest_in_family(&self, provider_id: &str, family_id: &str) -> Result<&ModelInfo> {
        self.get_family(provider_id, family_id)
            .fastest()
            .ok_or_else(|| UnknownFamilySnafu { provider_id: provider_id.to_string(), family: family_id.to_string() }.build())
    }

    /// The nearest reasoning effort `model_id` actually supports to
    /// `requested` (spec §4.4 supplemental `effort_rank`/`nearest_effort`).
    pub fn nearest_effort_for_model(&self, model_id: &str, requested: ReasoningEffort) -> Result<ReasoningEffort> {
        Ok(self.get_model(model_id)?.nearest_supported_effort(requested))
    }

    /// Returns the dynamic capability payload for `key`, serving from the
    /// one-hour TTL cache on a hit and invoking `fetch` on a miss.
    pub async fn dynamic_capabilities<F, Fut, E>(&self, key: &CapabilityCacheKey, fetch: F) -> std::result::Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<serde_json::Value, E>>,
    {
        self.dynamic_capabilities.get_or_fetch(key, fetch).await
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
