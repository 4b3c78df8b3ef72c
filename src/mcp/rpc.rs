//! JSON-RPC protocol representations and formatting utilities
//!
//! Provides standardized mapping of internal AppErrors to valid JSON-RPC payloads.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

/// Maps an `AppError` to the JSON-RPC error class it belongs to: bad requests
/// become `-32602` with the offending constraint in `data`, everything else
/// is an internal error with the cause text in the message.
pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    match &err {
        AppError::BadRequest { code, .. } => json_rpc_error_with_data(
            id,
            -32602,
            &err.to_string(),
            Some(json!({ "code": code })),
        ),
        AppError::Upstream { .. } | AppError::Internal { .. } => {
            json_rpc_error(id, -32603, &err.to_string())
        }
    }
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}
