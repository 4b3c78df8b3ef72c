//! Axum HTTP handlers for the web server
//!
//! Provides the primary Model Context Protocol endpoint, and general metadata endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::mcp::rpc::json_rpc_error;
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct McpInfoResponse {
    pub message: &'static str,
    pub note: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        server: env!("CARGO_PKG_NAME"),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn mcp_info() -> Json<McpInfoResponse> {
    Json(McpInfoResponse {
        message: "MCP Server is running",
        note: "Use POST requests for MCP protocol communication",
    })
}

pub async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json_rpc_error(None, -32700, "Parse error")),
            )
                .into_response()
        }
    };

    match handle_json_rpc_value(&state, payload).await {
        Some(response) => (status_for_response(&response), Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

// JSON-RPC errors ride in a 200 body; only the parse/malformed,
// invalid-params and internal classes keep plain HTTP statuses.
fn status_for_response(response: &Value) -> StatusCode {
    match response
        .get("error")
        .and_then(|error| error.get("code"))
        .and_then(Value::as_i64)
    {
        Some(-32700) | Some(-32600) | Some(-32602) => StatusCode::BAD_REQUEST,
        Some(-32603) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    }
}
