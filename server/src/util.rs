//! Small helpers shared by the routers. `provider_credentials` mirrors
//! `relay_streaming::engine`'s private helper of the same shape — this
//! crate needs the same `AIConfig` → provider-config map translation for
//! `session.compact` and isn't able to reach across that crate boundary.

use std::collections::HashMap;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use relay_config::ProviderConfig;

pub fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

pub fn provider_credentials(config: Option<&ProviderConfig>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(config) = config else {
        return map;
    };
    if let Some(key) = &config.api_key {
        map.insert("api_key".to_string(), key.clone());
    }
    if let Some(base_url) = &config.base_url {
        map.insert("base_url".to_string(), base_url.clone());
    }
    if let Some(model) = &config.default_model {
        map.insert("default_model".to_string(), model.clone());
    }
    map
}
