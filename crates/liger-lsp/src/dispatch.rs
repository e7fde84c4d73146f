//! Method → handler routing and request/notification classification, per
//! spec.md §4.B.
//!
//! A `match` over `liger_protocol::methods` constants, not a runtime hash
//! map of closures — the method set is fixed at compile time, so a `match`
//! is both more idiomatic and (per spec.md §9's design note) exactly what
//! the teacher's own routing does.

use crate::handlers;
use crate::server::LspServer;
use crate::state::ServerState;
use liger_oracle::Subprocess;
use liger_protocol::{methods, JsonRpcError, INVALID_PARAMS, METHOD_NOT_FOUND, SERVER_NOT_INITIALIZED};
use lsp_types::Diagnostic;
use serde_json::Value;

/// Dispatch one request. `Ok` carries the JSON result to send back to the
/// client; `Err` carries the JSON-RPC error to send instead.
pub fn dispatch_request<S: Subprocess>(
    server: &mut LspServer<S>,
    method: &str,
    params: &Value,
) -> Result<Value, JsonRpcError> {
    if method != methods::INITIALIZE && !server.state().is_initialized() {
        return Err(JsonRpcError::new(SERVER_NOT_INITIALIZED, "server has not received 'initialize' yet"));
    }

    match method {
        methods::INITIALIZE => {
            let result = handlers::initialize(server, params);
            server.mark_initialized();
            Ok(result)
        }
        methods::SHUTDOWN => Ok(handlers::shutdown(server)),
        methods::HOVER => Ok(handlers::hover(server, params)),
        methods::DEFINITION => Ok(handlers::definition(server, params)),
        methods::COMPLETION => Ok(handlers::completion(server, params)),
        methods::SIGNATURE_HELP => Ok(handlers::signature_help(server, params)),
        methods::REFERENCES => Ok(handlers::references(server, params)),
        methods::DOCUMENT_SYMBOL => Ok(handlers::document_symbol(server, params)),
        methods::WORKSPACE_SYMBOL => Ok(handlers::workspace_symbol(server, params)),
        methods::RENAME => Ok(handlers::rename(server, params)),
        methods::PREPARE_RENAME => Ok(handlers::prepare_rename(server, params)),
        _ => Err(JsonRpcError::new(METHOD_NOT_FOUND, format!("no handler for request method '{method}'"))),
    }
}

/// Dispatch one notification. Returns `Some((uri, diagnostics))` if the
/// notification should trigger a `textDocument/publishDiagnostics`, per
/// spec.md §6. Unknown notification methods are logged and swallowed —
/// notifications never produce an error response.
pub fn dispatch_notification<S: Subprocess>(
    server: &mut LspServer<S>,
    method: &str,
    params: &Value,
) -> Option<(String, Vec<Diagnostic>)> {
    if !server.state().is_initialized() && method != methods::EXIT {
        eprintln!("[liger] dropping notification '{method}' received before 'initialize'");
        return None;
    }

    match method {
        methods::INITIALIZED => None,
        methods::EXIT => {
            server.mark_exited();
            None
        }
        methods::DID_OPEN => handlers::did_open(server, params),
        methods::DID_CHANGE => handlers::did_change(server, params),
        methods::DID_SAVE => handlers::did_save(server, params),
        methods::DID_CLOSE => {
            handlers::did_close(server, params);
            None
        }
        other => {
            eprintln!("[liger] no handler for notification method '{other}'");
            None
        }
    }
}

/// Build the `InvalidParams` error for a handler that could not make sense
/// of its params. Currently unused by any handler (every handler degrades
/// to a `null`/`[]` result on malformed params instead, per spec.md §7's
/// "null result for queries that cannot be answered"), but kept available
/// for handlers added later that must reject rather than degrade.
#[allow(dead_code)]
pub fn invalid_params(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INVALID_PARAMS, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ServerState;
    use liger_oracle::subprocess::mock::MockSubprocess;
    use liger_tdd_support::must;
    use serde_json::json;

    fn server() -> (tempfile::TempDir, LspServer<MockSubprocess>) {
        let dir = must(tempfile::tempdir());
        let server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        (dir, server)
    }

    #[test]
    fn requests_before_initialize_are_rejected_except_initialize_itself() {
        let (_dir, mut server) = server();
        let err = dispatch_request(&mut server, methods::HOVER, &json!({})).unwrap_err();
        assert_eq!(err.code, SERVER_NOT_INITIALIZED);

        let ok = dispatch_request(&mut server, methods::INITIALIZE, &json!({}));
        assert!(ok.is_ok());
        assert_eq!(server.state(), ServerState::Initialized);
    }

    #[test]
    fn unknown_request_method_is_method_not_found() {
        let (_dir, mut server) = server();
        must(dispatch_request(&mut server, methods::INITIALIZE, &json!({})));
        let err = dispatch_request(&mut server, "textDocument/bogus", &json!({})).unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
    }

    #[test]
    fn shutdown_then_exit_reaches_exited_state() {
        let (_dir, mut server) = server();
        must(dispatch_request(&mut server, methods::INITIALIZE, &json!({})));
        must(dispatch_request(&mut server, methods::SHUTDOWN, &json!({})));
        assert_eq!(server.state(), ServerState::ShuttingDown);
        assert_eq!(server.exit_code(), 0);
        dispatch_notification(&mut server, methods::EXIT, &json!({}));
        assert_eq!(server.state(), ServerState::Exited);
    }

    #[test]
    fn did_open_notification_yields_diagnostics_to_publish() {
        let (_dir, mut server) = server();
        must(dispatch_request(&mut server, methods::INITIALIZE, &json!({})));
        let params = json!({
            "textDocument": { "uri": "file:///a.cr", "languageId": "crystal", "version": 1, "text": "puts 1\n" }
        });
        let published = dispatch_notification(&mut server, methods::DID_OPEN, &params);
        assert_eq!(published.map(|(uri, _)| uri), Some("file:///a.cr".to_string()));
    }
}
