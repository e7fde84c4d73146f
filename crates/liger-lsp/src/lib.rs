//! Dispatch core, server lifecycle, and stdio runtime for `liger`, the
//! Crystal language server, per spec.md §4.B and §6.
//!
//! This crate wires every other `liger-*` crate into the read-dispatch-
//! write loop a `liger` binary runs: [`transport`](liger_transport) frames
//! messages, [`dispatch`] routes them by method name against the
//! lifecycle state machine in [`state`], [`handlers`] translate wire JSON
//! to and from the document store / analyzer / workspace index, and
//! [`server::LspServer`] owns all of it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
mod handlers;
pub mod server;
pub mod state;

pub use server::LspServer;
pub use state::ServerState;

use liger_oracle::{OsSubprocess, Subprocess};
use liger_protocol::{methods, JsonRpcError, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR};
use liger_transport::{read_message, write_message, write_notification};
use std::io::{BufRead, Write};

/// Run the dispatch loop over `reader`/`writer` until EOF or `exit`.
///
/// Returns the process exit code the caller's `main` should use: 0 if
/// `shutdown` preceded `exit` (or the client simply closed the pipe), 1 if
/// `exit` arrived without a preceding `shutdown`, per spec.md §4.B/§6.
pub fn run_loop<S: Subprocess, R: BufRead, W: Write>(server: &mut LspServer<S>, reader: &mut R, writer: &mut W) -> i32 {
    loop {
        let message = match read_message(reader) {
            Ok(Some(msg)) => msg,
            Ok(None) => return 0, // clean EOF
            Err(e) => {
                eprintln!("[liger] transport read failed: {e}");
                return 1;
            }
        };

        if message.is_request() {
            handle_request(server, writer, message);
        } else {
            handle_notification(server, writer, message);
        }

        if server.state() == ServerState::Exited {
            return server.exit_code();
        }
    }
}

fn handle_request<S: Subprocess, W: Write>(server: &mut LspServer<S>, writer: &mut W, message: JsonRpcRequest) {
    let params = message.params.clone().unwrap_or(serde_json::Value::Null);
    let response = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        dispatch::dispatch_request(server, &message.method, &params)
    })) {
        Ok(Ok(result)) => JsonRpcResponse::success(message.id.clone(), result),
        Ok(Err(error)) => JsonRpcResponse::error(message.id.clone(), error),
        Err(panic) => {
            let backtrace = panic_message(&panic);
            eprintln!("[liger] handler for '{}' panicked: {backtrace}", message.method);
            JsonRpcResponse::error(
                message.id.clone(),
                JsonRpcError::with_data(INTERNAL_ERROR, "internal error", serde_json::Value::String(backtrace)),
            )
        }
    };
    if let Err(e) = write_message(writer, &response) {
        eprintln!("[liger] failed to write response: {e}");
    }
}

fn handle_notification<S: Subprocess, W: Write>(server: &mut LspServer<S>, writer: &mut W, message: JsonRpcRequest) {
    let params = message.params.clone().unwrap_or(serde_json::Value::Null);
    let published = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        dispatch::dispatch_notification(server, &message.method, &params)
    })) {
        Ok(published) => published,
        Err(panic) => {
            eprintln!("[liger] notification handler for '{}' panicked: {}", message.method, panic_message(&panic));
            None
        }
    };
    if let Some((uri, diagnostics)) = published {
        let params = serde_json::json!({ "uri": uri, "diagnostics": diagnostics });
        if let Err(e) = write_notification(writer, methods::PUBLISH_DIAGNOSTICS, params) {
            eprintln!("[liger] failed to publish diagnostics for {uri}: {e}");
        }
    }
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Convenience constructor: a server rooted at the process's current
/// working directory, backed by the real `crystal` subprocess. `main.rs`
/// overrides the root from `initialize`'s params once the client sends it.
pub fn default_server() -> LspServer<OsSubprocess> {
    let root = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    LspServer::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_oracle::subprocess::mock::MockSubprocess;
    use liger_tdd_support::must;
    use std::io::{BufReader, Cursor};

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
    }

    #[test]
    fn eof_on_empty_input_exits_cleanly() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        let mut reader = BufReader::new(Cursor::new(""));
        let mut writer = Vec::new();
        assert_eq!(run_loop(&mut server, &mut reader, &mut writer), 0);
    }

    #[test]
    fn initialize_then_exit_without_shutdown_exits_with_code_one() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        let input = format!(
            "{}{}",
            frame(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#),
            frame(r#"{"jsonrpc":"2.0","method":"exit"}"#),
        );
        let mut reader = BufReader::new(Cursor::new(input));
        let mut writer = Vec::new();
        assert_eq!(run_loop(&mut server, &mut reader, &mut writer), 1);
    }

    #[test]
    fn shutdown_then_exit_exits_with_code_zero() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        let input = format!(
            "{}{}{}",
            frame(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#),
            frame(r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#),
            frame(r#"{"jsonrpc":"2.0","method":"exit"}"#),
        );
        let mut reader = BufReader::new(Cursor::new(input));
        let mut writer = Vec::new();
        assert_eq!(run_loop(&mut server, &mut reader, &mut writer), 0);
    }

    #[test]
    fn did_open_triggers_a_publish_diagnostics_notification() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        let open = r#"{"jsonrpc":"2.0","method":"textDocument/didOpen","params":{"textDocument":{"uri":"file:///a.cr","languageId":"crystal","version":1,"text":"puts 1\n"}}}"#;
        let input = format!(
            "{}{}{}",
            frame(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#),
            frame(open),
            frame(r#"{"jsonrpc":"2.0","method":"exit"}"#),
        );
        let mut reader = BufReader::new(Cursor::new(input));
        let mut writer = Vec::new();
        run_loop(&mut server, &mut reader, &mut writer);
        let text = must(String::from_utf8(writer));
        assert!(text.contains("publishDiagnostics"));
    }

    #[test]
    fn request_before_initialize_gets_server_not_initialized_error() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        let input = format!(
            "{}{}",
            frame(r#"{"jsonrpc":"2.0","id":1,"method":"textDocument/hover","params":{}}"#),
            frame(r#"{"jsonrpc":"2.0","method":"exit"}"#),
        );
        let mut reader = BufReader::new(Cursor::new(input));
        let mut writer = Vec::new();
        run_loop(&mut server, &mut reader, &mut writer);
        let text = must(String::from_utf8(writer));
        assert!(text.contains("-32002"));
    }
}
