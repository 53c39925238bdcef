//! The `config` router (spec §4.11, §6 `AIConfig`): load/save the
//! persisted config, expose provider metadata for client setup forms, and
//! the sync token estimator (`countFileTokens`).

use async_trait::async_trait;
use relay_config::AiConfig;
use serde_json::Value;
use snafu::ResultExt;

use crate::dto::CountFileTokensParams;
use crate::dto::CountFileTokensResult;
use crate::dto::GetProviderSchemaParams;
use crate::dto::UpdateConfigRulesParams;
use crate::error::Result;
use crate::error::rpc_error::ConfigSnafu;
use crate::error::rpc_error::ProviderSnafu;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::params::parse;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;
use crate::state::AppState;

const ROUTER: &str = "config";

pub struct ConfigRouter {
    state: AppState,
}

impl ConfigRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    async fn persist(&self, config: &AiConfig) -> Result<()> {
        relay_config::save(&self.state.config_dir, config).context(ConfigSnafu)
    }
}

#[async_trait]
impl RpcRouter for ConfigRouter {
    fn name(&self) -> &'static str {
        ROUTER
    }

    fn security_for(&self, procedure: &str) -> SecurityLevel {
        match procedure {
            "save" | "updateRules" => SecurityLevel::Strict,
            _ => SecurityLevel::Public,
        }
    }

    async fn call(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<Value> {
        match procedure {
            "load" => {
                let loaded = relay_config::load(&self.state.config_dir).context(ConfigSnafu)?;
                *self.state.config.write().await = loaded.clone();
                Ok(serde_json::to_value(loaded).expect("serializable"))
            }
            "save" => {
                let config: AiConfig = parse(ROUTER, procedure, params)?;
                self.persist(&config).await?;
                *self.state.config.write().await = config.clone();
                Ok(serde_json::to_value(config).expect("serializable"))
            }
            "getProviders" => Ok(serde_json::to_value(self.state.model_registry.get_all_providers()).expect("serializable")),
            "getProviderSchema" => {
                let p: GetProviderSchemaParams = parse(ROUTER, procedure, params)?;
                let provider = self.state.provider_registry.get(&p.provider_id).context(ProviderSnafu)?;
                Ok(serde_json::to_value(provider.config_schema()).expect("serializable"))
            }
            "updateRules" => {
                let p: UpdateConfigRulesParams = parse(ROUTER, procedure, params)?;
                let mut config = self.state.config.write().await;
                config.default_enabled_rule_ids = Some(p.enabled_rule_ids);
                let snapshot = config.clone();
                drop(config);
                self.persist(&snapshot).await?;
                Ok(serde_json::to_value(snapshot).expect("serializable"))
            }
            "countFileTokens" => {
                let p: CountFileTokensParams = parse(ROUTER, procedure, params)?;
                let tokens = self.state.calculator.estimate_tokens(&p.text);
                Ok(serde_json::to_value(CountFileTokensResult { tokens }).expect("serializable"))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }
}

#[cfg(test)]
#[path = "config.test.rs"]
mod tests;
