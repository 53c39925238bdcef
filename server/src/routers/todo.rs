//! The `todo` router (spec §4.11): replaces a session's todo list wholesale.
//! Thin wrapper over `SessionStore::update_todos`; no business logic (todo
//! ordering/ids are the caller's responsibility, same as the Streaming
//! Engine's own todo-snapshot handling in spec §4.8).

use async_trait::async_trait;
use serde_json::Value;
use snafu::ResultExt;

use crate::dto::SessionDto;
use crate::dto::TodoUpdateParams;
use crate::error::Result;
use crate::error::rpc_error::SessionStoreSnafu;
use crate::error::rpc_error::UnknownProcedureSnafu;
use crate::params::parse;
use crate::router::RpcRouter;
use crate::security::SecurityContext;
use crate::security::SecurityLevel;
use crate::state::AppState;

const ROUTER: &str = "todo";

pub struct TodoRouter {
    state: AppState,
}

impl TodoRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl RpcRouter for TodoRouter {
    fn name(&self) -> &'static str {
        ROUTER
    }

    fn security_for(&self, _procedure: &str) -> SecurityLevel {
        SecurityLevel::Moderate
    }

    async fn call(&self, procedure: &str, params: Value, _ctx: &SecurityContext) -> Result<Value> {
        match procedure {
            "update" => {
                let p: TodoUpdateParams = parse(ROUTER, procedure, params)?;
                let session = self.state.session_store.update_todos(&p.session_id, p.todos, p.next_todo_id).await.context(SessionStoreSnafu)?;
                Ok(serde_json::to_value(SessionDto::from(&session)).expect("serializable"))
            }
            other => Err(UnknownProcedureSnafu { router: ROUTER.to_string(), procedure: other.to_string() }.build()),
        }
    }
}

#[cfg(test)]
#[path = "todo.test.rs"]
mod tests;
