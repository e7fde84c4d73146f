//! JSON-RPC and LSP-reserved error codes.
//!
//! See the [LSP specification's error-code table](https://microsoft.github.io/language-server-protocol/specifications/lsp/3.17/specification/)
//! for the canonical values; these mirror it exactly.

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The requested method does not exist or is not available.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;
/// A request was sent before the server received the `initialize` request.
pub const SERVER_NOT_INITIALIZED: i32 = -32002;
/// The client cancelled a request and the server stopped processing it.
pub const REQUEST_CANCELLED: i32 = -32800;
/// The result of a request has been affected by a later state change.
pub const CONTENT_MODIFIED: i32 = -32801;
