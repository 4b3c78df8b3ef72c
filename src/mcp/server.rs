//! The central Model Context Protocol engine
//!
//! Provides request classification (call vs. notification vs. malformed),
//! method routing, and the fixed `initialize` capability descriptor.

use rust_mcp_sdk::schema::ListToolsResult;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::tools::{build_tools_list, handle_tools_call};
use crate::mcp::rpc::{is_json_rpc_error, json_rpc_error, json_rpc_result};
use crate::AppState;

pub const PROTOCOL_VERSION: &str = "2025-06-18";

const INVALID_REQUEST_MESSAGE: &str = "Invalid Request - missing required fields";

/// How a decoded payload is to be processed.
#[derive(Debug, PartialEq)]
pub enum EnvelopeClass<'a> {
    /// `method` present, `id` key absent. Processed without a response body.
    Notification { method: &'a str },
    /// `jsonrpc` is the literal "2.0", `method` and the `id` key present.
    /// Answered exactly once.
    Call {
        id: Value,
        method: &'a str,
        params: Option<Value>,
    },
    /// Anything else. Answered with -32600, echoing `id` when present.
    Malformed { id: Option<Value> },
}

pub fn classify_envelope(payload: &Value) -> EnvelopeClass<'_> {
    let Some(envelope) = payload.as_object() else {
        return EnvelopeClass::Malformed { id: None };
    };

    let method = envelope
        .get("method")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|method| !method.is_empty());
    let id = envelope.get("id");

    match (method, id) {
        (Some(method), None) => EnvelopeClass::Notification { method },
        (Some(method), Some(id))
            if envelope.get("jsonrpc").and_then(Value::as_str) == Some("2.0") =>
        {
            EnvelopeClass::Call {
                id: id.clone(),
                method,
                params: envelope.get("params").cloned(),
            }
        }
        (_, id) => EnvelopeClass::Malformed { id: id.cloned() },
    }
}

/// Dispatches one decoded request. Returns `None` when no response body may
/// be sent (notifications), `Some(envelope)` otherwise.
pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Value> {
    match classify_envelope(&payload) {
        EnvelopeClass::Notification { method } => {
            handle_notification(method);
            None
        }
        EnvelopeClass::Call { id, method, params } => {
            Some(handle_json_rpc_request(state, Some(id), method, params).await)
        }
        EnvelopeClass::Malformed { id } => {
            Some(json_rpc_error(id, -32600, INVALID_REQUEST_MESSAGE))
        }
    }
}

fn handle_notification(method: &str) {
    match method {
        "notifications/initialized" => info!("client initialized"),
        "notifications/cancelled" => info!("client cancelled an in-flight request"),
        other => debug!(method = %other, "ignoring unknown notification"),
    }
}

pub async fn handle_json_rpc_request(
    state: &AppState,
    id: Option<Value>,
    method: &str,
    params: Option<Value>,
) -> Value {
    let response = match method {
        "initialize" => json_rpc_result(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "tools/list" => json_rpc_result(
            id,
            serde_json::to_value(ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: build_tools_list(),
            })
            .expect("tools list result serialization"),
        ),
        "tools/call" => handle_tools_call(state, id, params).await,
        _ => json_rpc_error(id, -32601, &format!("Method not found: {method}")),
    };

    info!(
        method = %method,
        outcome = if is_json_rpc_error(&response) { "failure" } else { "success" },
        "mcp request handled"
    );

    response
}
