//! Decodes a procedure's JSON params into its typed DTO, turning a
//! malformed request into an [`RpcError::InvalidParams`](crate::error::RpcError)
//! instead of a panic or a generic deserialize error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::error::rpc_error::InvalidParamsSnafu;

pub fn parse<T: DeserializeOwned>(router: &str, procedure: &str, params: Value) -> Result<T> {
    serde_json::from_value(params)
        .map_err(|e| InvalidParamsSnafu { router: router.to_string(), procedure: procedure.to_string(), message: e.to_string() }.build())
}

#[cfg(test)]
#[path = "params.test.rs"]
mod tests;
