//! HTTP/SSE transport for the RPC layer (spec §4.11, §6): a thin layer over
//! [`RpcDispatcher`] that frames queries/mutations as `POST /rpc/:proc` and
//! subscriptions as `GET /rpc/:proc` SSE. Grounded in the teacher's
//! `querymt-service::main` axum/SSE wiring, generalized past a single
//! provider endpoint to the `<router>.<procedure>` dispatch this crate adds.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::response::sse::Event as SseEvent;
use axum::response::sse::KeepAlive;
use axum::response::sse::Sse;
use axum::routing::get;
use axum::routing::post;
use futures::StreamExt;
use relay_error::ErrorExt;
use relay_error::StatusCategory;
use serde_json::Value;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::dispatch::RpcDispatcher;
use crate::dispatch::split_name;
use crate::error::RpcError;
use crate::error::rpc_error::UnknownRouterSnafu;
use crate::security::SecurityContext;

#[derive(Clone)]
pub struct HttpState {
    pub dispatcher: Arc<RpcDispatcher>,
}

/// Builds the `axum::Router` serving both transports at `/rpc/:proc`. CORS
/// is left permissive, same call the teacher makes for its own service —
/// the caller is expected to front this with its own network boundary.
pub fn build_router(dispatcher: Arc<RpcDispatcher>) -> Router {
    Router::new()
        .route("/rpc/{proc}", post(handle_call))
        .route("/rpc/{proc}", get(handle_subscribe))
        .layer(CorsLayer::permissive())
        .with_state(HttpState { dispatcher })
}

/// Maps a [`RpcError`]'s [`relay_error::StatusCode`] category to an HTTP
/// status. Within a category the finer-grained code still rides along in
/// the JSON body (spec §6 `{error: {code, message}}`).
fn http_status_for(err: &RpcError) -> HttpStatusCode {
    match err.status_code().category() {
        StatusCategory::Success => HttpStatusCode::OK,
        StatusCategory::Input => HttpStatusCode::BAD_REQUEST,
        StatusCategory::Auth => HttpStatusCode::UNAUTHORIZED,
        StatusCategory::Resource => HttpStatusCode::TOO_MANY_REQUESTS,
        StatusCategory::Network => HttpStatusCode::BAD_GATEWAY,
        StatusCategory::Config | StatusCategory::Provider | StatusCategory::IO | StatusCategory::Common => {
            HttpStatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_body(err: &RpcError) -> Value {
    json!({
        "error": {
            "code": err.status_code().name(),
            "message": err.to_string(),
        }
    })
}

fn security_context_from(headers: &HeaderMap) -> SecurityContext {
    headers
        .get("x-caller-id")
        .and_then(|v| v.to_str().ok())
        .map(SecurityContext::with_caller)
        .unwrap_or_else(SecurityContext::anonymous)
}

/// Coerces a query string's string values into JSON, so subscription params
/// (e.g. `replayLast`, numeric cursor fields) deserialize the same as a
/// POST body would. Each value is parsed as a number or boolean on a
/// best-effort basis and falls back to a JSON string.
///
/// `fromCursorTimestamp`/`fromCursorSequence` are folded into a nested
/// `fromCursor` object (spec §6: reconnection supplies "the last seen
/// `(timestamp, sequence)` as a query parameter") since a flat query string
/// can't otherwise carry the `Cursor` struct `events.subscribe` expects.
fn query_to_json(mut query: HashMap<String, String>) -> Value {
    let cursor = match (query.remove("fromCursorTimestamp"), query.remove("fromCursorSequence")) {
        (Some(ts), Some(seq)) => ts.parse::<i64>().ok().zip(seq.parse::<i64>().ok()).map(|(timestamp, sequence)| json!({"timestamp": timestamp, "sequence": sequence})),
        _ => None,
    };

    let mut map: serde_json::Map<String, Value> = query
        .into_iter()
        .map(|(k, v)| {
            let coerced = if let Ok(n) = v.parse::<i64>() {
                json!(n)
            } else if let Ok(b) = v.parse::<bool>() {
                json!(b)
            } else {
                json!(v)
            };
            (k, coerced)
        })
        .collect();
    if let Some(cursor) = cursor {
        map.insert("fromCursor".to_string(), cursor);
    }
    Value::Object(map)
}

async fn handle_call(
    State(state): State<HttpState>,
    Path(proc): Path<String>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Response {
    let ctx = security_context_from(&headers);

    let Some((router, procedure)) = split_name(&proc) else {
        let err = UnknownRouterSnafu { router: proc.clone() }.build();
        return (http_status_for(&err), Json(error_body(&err))).into_response();
    };

    match state.dispatcher.security_for(router, procedure) {
        Ok(level) if !ctx.satisfies(level) => {
            return (
                HttpStatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": "AuthenticationFailed", "message": "caller identity required"}})),
            )
                .into_response();
        }
        Err(err) => return (http_status_for(&err), Json(error_body(&err))).into_response(),
        Ok(_) => {}
    }

    match state.dispatcher.call(router, procedure, params, &ctx).await {
        Ok(result) => Json(json!({"result": result})).into_response(),
        Err(err) => {
            if err.status_code().should_log_error() {
                warn!(router, procedure, error = %err, "rpc call failed");
            }
            (http_status_for(&err), Json(error_body(&err))).into_response()
        }
    }
}

async fn handle_subscribe(
    State(state): State<HttpState>,
    Path(proc): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let ctx = security_context_from(&headers);
    let params = query_to_json(query);

    let Some((router, procedure)) = split_name(&proc) else {
        let err = UnknownRouterSnafu { router: proc.clone() }.build();
        return (http_status_for(&err), Json(error_body(&err))).into_response();
    };

    match state.dispatcher.security_for(router, procedure) {
        Ok(level) if !ctx.satisfies(level) => {
            return (
                HttpStatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": "AuthenticationFailed", "message": "caller identity required"}})),
            )
                .into_response();
        }
        Err(err) => return (http_status_for(&err), Json(error_body(&err))).into_response(),
        Ok(_) => {}
    }

    let stream = match state.dispatcher.subscribe(router, procedure, params, &ctx).await {
        Ok(stream) => stream,
        Err(err) => return (http_status_for(&err), Json(error_body(&err))).into_response(),
    };

    let sse_stream = stream.map(|event| Ok::<_, Infallible>(SseEvent::default().data(event.to_string())));

    Sse::new(sse_stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("keep-alive"))
        .into_response()
}
