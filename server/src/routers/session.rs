//! The `session` router (spec §4.11): session listing, lifecycle, and
//! compaction. Thin translation layer over `relay-session-store` and
//! `relay-compaction` — no business logic lives here.

use std::sync::Arc;

use async_trait::async_trait;
use relay_session_store::SessionStore;
use serde_json::Value;
use snafu::ResultExt;

use crate::dto::CompactResultDto;
use crate::dto::CreateSessionParams;
use crate::dto::GetRecentParams;
use crate::dto::PageDto;
use crate::dto::SearchParams;
use crate::dto::SessionDto;
use crate::dto::SessionIdParams;
use crate::dto::SessionMetadataDto;
use crate::dto::UpdateModelParams;
use crate::dto::UpdateProviderParams;
use crate::dto::UpdateRulesParams;
use crate::dto::UpdateTitleParams;
use crate::error::Result;
use crate::error::rpc_error::CompactionSnafu;
use crate::error::rpc_error::ProviderSnafu;
use crate::error::rpc_error::SessionNotFoundSnafu;
use crate::error::rpc_error::SessionStoreSnafu;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::params::parse;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;
use crate::state::AppState;
use crate::util::now_ms;
use crate::util::provider_credentials;

const ROUTER: &str = "session";

pub struct SessionRouter {
    state: AppState,
}

impl SessionRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    fn session_store(&self) -> &Arc<SessionStore> {
        &self.state.session_store
    }
}

#[async_trait]
impl RpcRouter for SessionRouter {
    fn name(&self) -> &'static str {
        ROUTER
    }

    fn security_for(&self, procedure: &str) -> SecurityLevel {
        match procedure {
            "delete" | "compact" => SecurityLevel::Strict,
            "create" | "updateTitle" | "updateModel" | "updateProvider" | "updateRules" => SecurityLevel::Moderate,
            _ => SecurityLevel::Public,
        }
    }

    async fn call(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<Value> {
        match procedure {
            "getRecent" => {
                let p: GetRecentParams = parse(ROUTER, procedure, params)?;
                let page = self.session_store().get_recent_sessions_metadata(p.limit, p.cursor.as_deref()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(PageDto::<SessionMetadataDto>::from(page)).expect("serializable"))
            }
            "search" => {
                let p: SearchParams = parse(ROUTER, procedure, params)?;
                let page = self.session_store().search_sessions_metadata(&p.query, p.limit, p.cursor.as_deref()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(PageDto::<SessionMetadataDto>::from(page)).expect("serializable"))
            }
            "getById" => {
                let p: SessionIdParams = parse(ROUTER, procedure, params)?;
                let found = self.session_store().get_session_by_id(&p.session_id).await.context(SessionStoreSnafu)?;
                match found {
                    Some((session, messages)) => Ok(serde_json::json!({
                        "session": SessionDto::from(&session),
                        "messages": messages,
                    })),
                    None => Ok(Value::Null),
                }
            }
            "create" => {
                let p: CreateSessionParams = parse(ROUTER, procedure, params)?;
                let session = self
                    .session_store()
                    .create_session(p.provider, p.model, p.agent_id.unwrap_or_default(), p.enabled_rule_ids.unwrap_or_default(), now_ms())
                    .await
                    .context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            "updateTitle" => {
                let p: UpdateTitleParams = parse(ROUTER, procedure, params)?;
                let session = self.session_store().update_session_title(&p.session_id, p.title, now_ms()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            "updateModel" => {
                let p: UpdateModelParams = parse(ROUTER, procedure, params)?;
                let session = self.session_store().update_session_model(&p.session_id, p.model_id, now_ms()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            "updateProvider" => {
                let p: UpdateProviderParams = parse(ROUTER, procedure, params)?;
                let session = self.session_store().update_session_provider(&p.session_id, p.provider_id, now_ms()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            "updateRules" => {
                let p: UpdateRulesParams = parse(ROUTER, procedure, params)?;
                let session = self.session_store().update_session_enabled_rule_ids(&p.session_id, p.enabled_rule_ids, now_ms()).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            "delete" => {
                let p: SessionIdParams = parse(ROUTER, procedure, params)?;
                self.session_store().delete_session(&p.session_id).await.context(SessionStoreSnafu)?;
                Ok(Value::Null)
            }
            "compact" => {
                let p: SessionIdParams = parse(ROUTER, procedure, params)?;
                let (session, _) = self
                    .session_store()
                    .get_session_by_id(&p.session_id)
                    .await
                    .context(SessionStoreSnafu)?
                    .ok_or_else(|| SessionNotFoundSnafu { session_id: p.session_id.clone() }.build())?;
                let provider = self.state.provider_registry.get(&session.provider_id).context(ProviderSnafu)?;
                let provider_config = provider_credentials(self.state.config.read().await.provider(&session.provider_id));
                let result = self.state.compaction.compact(&session.id, provider, &provider_config, &session.model_id, now_ms()).await.context(CompactionSnafu)?;
                Ok(serde_json::to_value(CompactResultDto::from(result)).expect("serializable"))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
