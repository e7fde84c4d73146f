//! JSON-RPC 2.0 message types.
//!
//! Core request, response, and error types for JSON-RPC communication over
//! the LSP Base Protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON-RPC 2.0 message received from the client.
///
/// The `id` field distinguishes requests (`Some`) from notifications
/// (`None`); the dispatch core routes on its presence rather than on the
/// method name.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version, always `"2.0"`.
    #[serde(rename = "jsonrpc", default)]
    pub jsonrpc: String,

    /// Request identifier. Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,

    /// Method name to invoke.
    pub method: String,

    /// Method parameters, if any.
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Returns true if this message carries an `id` and is therefore a
    /// request expecting a response, rather than a notification.
    pub fn is_request(&self) -> bool {
        self.id.is_some()
    }
}

/// A JSON-RPC 2.0 response sent back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version, always `"2.0"`.
    pub jsonrpc: String,

    /// Echoes the request's `id`.
    pub id: Option<Value>,

    /// Success result. Mutually exclusive with `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error result. Mutually exclusive with `result`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Build a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(result), error: None }
    }

    /// Build an error response.
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: None, error: Some(error) }
    }

    /// Build a `null`-result response, for operations with no meaningful
    /// return value.
    pub fn null(id: Option<Value>) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, result: Some(Value::Null), error: None }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Error code. See [`crate::error_codes`] for the reserved LSP range.
    pub code: i32,

    /// Human-readable error message.
    pub message: String,

    /// Additional error data, e.g. a backtrace string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new error with no attached data.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    /// Create a new error carrying additional structured data.
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self { code, message: message.into(), data: Some(data) }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::must;

    #[test]
    fn request_without_id_is_notification() {
        let req = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: None,
            method: "textDocument/didOpen".into(),
            params: None,
        };
        assert!(!req.is_request());
    }

    #[test]
    fn request_with_id_is_request() {
        let req = JsonRpcRequest {
            jsonrpc: "2.0".into(),
            id: Some(Value::from(1)),
            method: "textDocument/hover".into(),
            params: None,
        };
        assert!(req.is_request());
    }

    #[test]
    fn success_response_omits_error_field() {
        let resp = JsonRpcResponse::success(Some(Value::from(1)), Value::from("ok"));
        let json = must(serde_json::to_value(&resp));
        assert!(json.get("error").is_none());
        assert_eq!(json["result"], "ok");
    }

    #[test]
    fn error_response_omits_result_field() {
        let resp = JsonRpcResponse::error(Some(Value::from(1)), JsonRpcError::new(-32601, "nope"));
        let json = must(serde_json::to_value(&resp));
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32601);
    }
}
