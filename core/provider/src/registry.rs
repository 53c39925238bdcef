//! Dynamic dispatch over registered providers, by id (spec §4.5 Design
//! Notes "Dynamic dispatch over providers and tools").

use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::Provider;
use crate::error::Result;
use crate::error::provider_error::UnknownProviderSnafu;

/// Effectively-immutable after startup registration (spec §5 "Locks").
///
/// Grounded in the teacher's `ProviderRegistry` (`hyper-sdk::registry`):
/// same `RwLock<HashMap<String, Arc<dyn Provider>>>` shape, generalized to
/// this core's async `Provider` trait.
pub struct ProviderRegistry {
    providers: std::sync::RwLock<HashMap<String, Arc<dyn Provider>>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: std::sync::RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, provider: Arc<dyn Provider>) {
        let id = provider.id().to_string();
        self.providers.write().expect("provider registry lock poisoned").insert(id, provider);
    }

    pub fn get(&self, provider_id: &str) -> Result<Arc<dyn Provider>> {
        self.providers
            .read()
            .expect("provider registry lock poisoned")
            .get(provider_id)
            .cloned()
            .ok_or_else(|| UnknownProviderSnafu { provider_id: provider_id.to_string() }.build())
    }

    pub fn list_ids(&self) -> Vec<String> {
        self.providers.read().expect("provider registry lock poisoned").keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
