//! Per-method request/notification handlers.
//!
//! Every handler works directly on the raw `serde_json::Value` params and
//! returns a raw `serde_json::Value` result (or, for notifications, the
//! diagnostics to publish) — the same manual-JSON style `liger-protocol`
//! already uses for capability advertisement, rather than introducing a
//! second typed-params layer on top of `lsp_types`'s own wire DTOs.

use liger_document::TextChange;
use liger_oracle::Subprocess;
use liger_position::Position;
use liger_uri::uri_to_path;
use lsp_types::Diagnostic;
use serde_json::{json, Value};

use crate::server::LspServer;

fn text_document_uri(params: &Value) -> Option<String> {
    params["textDocument"]["uri"].as_str().map(String::from)
}

fn position_of(params: &Value) -> Option<Position> {
    let line = params["position"]["line"].as_u64()?;
    let character = params["position"]["character"].as_u64()?;
    Some(Position::new(line as u32, character as u32))
}

/// `initialize`: resolve the workspace root from `rootUri` (falling back to
/// the first `workspaceFolders` entry), re-root the server, and advertise
/// capabilities.
pub fn initialize<S: Subprocess>(server: &mut LspServer<S>, params: &Value) -> Value {
    let root_uri = params["rootUri"]
        .as_str()
        .or_else(|| params["workspaceFolders"].get(0).and_then(|f| f["uri"].as_str()));
    if let Some(path) = root_uri.and_then(uri_to_path) {
        server.set_root(path);
    }
    json!({
        "capabilities": liger_protocol::capabilities::server_capabilities(),
        "serverInfo": { "name": "liger", "version": env!("CARGO_PKG_VERSION") },
    })
}

/// `shutdown`: flips the lifecycle flag so a subsequent `exit` terminates
/// cleanly with status 0.
pub fn shutdown<S: Subprocess>(server: &mut LspServer<S>) -> Value {
    server.mark_shutting_down();
    Value::Null
}

/// `textDocument/hover`.
pub fn hover<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return Value::Null;
    };
    match server.analyzer().hover(&uri, pos) {
        Some(hover) => serde_json::to_value(hover).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// `textDocument/definition`.
pub fn definition<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return Value::Null;
    };
    match server.analyzer().goto_definition(&uri, pos) {
        Some(location) => serde_json::to_value(location).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// `textDocument/completion`.
pub fn completion<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return json!([]);
    };
    let items = server.analyzer().completion(&uri, pos);
    serde_json::to_value(items).unwrap_or_else(|_| json!([]))
}

/// `textDocument/signatureHelp` — always `null`, per spec.md §4.F.
pub fn signature_help<S: Subprocess>(_server: &LspServer<S>, _params: &Value) -> Value {
    Value::Null
}

/// `textDocument/references`.
pub fn references<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return json!([]);
    };
    let locations = server.analyzer().find_references(&uri, pos);
    serde_json::to_value(locations).unwrap_or_else(|_| json!([]))
}

/// `textDocument/documentSymbol`.
pub fn document_symbol<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let Some(uri) = text_document_uri(params) else { return json!([]) };
    let Some(doc) = server.documents().get(&uri) else { return json!([]) };
    let symbols = liger_parser::parse(&doc.text).document_symbols;
    serde_json::to_value(symbols).unwrap_or_else(|_| json!([]))
}

/// `workspace/symbol`.
pub fn workspace_symbol<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let query = params["query"].as_str().unwrap_or("");
    let symbols = server.analyzer().workspace_symbols(query);
    serde_json::to_value(symbols).unwrap_or_else(|_| json!([]))
}

/// `textDocument/rename`.
pub fn rename<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return Value::Null;
    };
    let Some(new_name) = params["newName"].as_str() else { return Value::Null };
    match server.analyzer().rename(&uri, pos, new_name) {
        Some(edit) => serde_json::to_value(edit).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// `textDocument/prepareRename`.
pub fn prepare_rename<S: Subprocess>(server: &LspServer<S>, params: &Value) -> Value {
    let (Some(uri), Some(pos)) = (text_document_uri(params), position_of(params)) else {
        return Value::Null;
    };
    match server.analyzer().prepare_rename(&uri, pos) {
        Some(range) => serde_json::to_value(range).unwrap_or(Value::Null),
        None => Value::Null,
    }
}

/// `textDocument/didOpen`: registers the document and returns the fresh
/// diagnostics to publish for it.
pub fn did_open<S: Subprocess>(server: &mut LspServer<S>, params: &Value) -> Option<(String, Vec<Diagnostic>)> {
    let td = &params["textDocument"];
    let uri = td["uri"].as_str()?.to_string();
    let language_id = td["languageId"].as_str().unwrap_or("crystal").to_string();
    let version = td["version"].as_i64().unwrap_or(1);
    let text = td["text"].as_str().unwrap_or("").to_string();
    server.documents_mut().open(&uri, language_id, version, text);
    Some((uri.clone(), server.diagnostics_for(&uri)))
}

/// `textDocument/didChange`: applies every change in arrival order and
/// returns the diagnostics for the new text. A no-op for an unknown URI,
/// per spec.md §4.C / §8.
pub fn did_change<S: Subprocess>(server: &mut LspServer<S>, params: &Value) -> Option<(String, Vec<Diagnostic>)> {
    let uri = params["textDocument"]["uri"].as_str()?.to_string();
    let version = params["textDocument"]["version"].as_i64().unwrap_or(0);
    let changes: Vec<TextChange> = params["contentChanges"]
        .as_array()
        .into_iter()
        .flatten()
        .map(parse_change)
        .collect();
    server.documents_mut().change(&uri, version, &changes);
    if server.documents().get(&uri).is_none() {
        return None;
    }
    Some((uri.clone(), server.diagnostics_for(&uri)))
}

fn parse_change(change: &Value) -> TextChange {
    let text = change["text"].as_str().unwrap_or("").to_string();
    let Some(range) = change.get("range") else { return TextChange::full(text) };
    let start = Position::new(
        range["start"]["line"].as_u64().unwrap_or(0) as u32,
        range["start"]["character"].as_u64().unwrap_or(0) as u32,
    );
    let end = Position::new(
        range["end"]["line"].as_u64().unwrap_or(0) as u32,
        range["end"]["character"].as_u64().unwrap_or(0) as u32,
    );
    TextChange::ranged(start, end, text)
}

/// `textDocument/didSave`: republishes diagnostics for the saved document.
pub fn did_save<S: Subprocess>(server: &mut LspServer<S>, params: &Value) -> Option<(String, Vec<Diagnostic>)> {
    let uri = text_document_uri(params)?;
    if server.documents().get(&uri).is_none() {
        return None;
    }
    Some((uri.clone(), server.diagnostics_for(&uri)))
}

/// `textDocument/didClose`: drops the document. No diagnostics are
/// published on close, per spec.md §6.
pub fn did_close<S: Subprocess>(server: &mut LspServer<S>, params: &Value) {
    if let Some(uri) = text_document_uri(params) {
        server.documents_mut().close(&uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_oracle::subprocess::mock::MockSubprocess;
    use liger_tdd_support::{must, must_some};

    fn server() -> (tempfile::TempDir, LspServer<MockSubprocess>) {
        let dir = must(tempfile::tempdir());
        let server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        (dir, server)
    }

    #[test]
    fn did_open_publishes_diagnostics_for_clean_source() {
        let (_dir, mut server) = server();
        let params = json!({
            "textDocument": { "uri": "file:///a.cr", "languageId": "crystal", "version": 1, "text": "puts 1\n" }
        });
        let (uri, diags) = must_some(did_open(&mut server, &params));
        assert_eq!(uri, "file:///a.cr");
        assert!(diags.is_empty());
    }

    #[test]
    fn did_change_on_unknown_uri_returns_none() {
        let (_dir, mut server) = server();
        let params = json!({
            "textDocument": { "uri": "file:///missing.cr", "version": 2 },
            "contentChanges": [{ "text": "x" }],
        });
        assert!(did_change(&mut server, &params).is_none());
    }

    #[test]
    fn did_change_applies_full_replace_and_reflects_in_hover() {
        let (_dir, mut server) = server();
        let open = json!({
            "textDocument": { "uri": "file:///a.cr", "languageId": "crystal", "version": 1, "text": "old\n" }
        });
        must_some(did_open(&mut server, &open));
        let change = json!({
            "textDocument": { "uri": "file:///a.cr", "version": 2 },
            "contentChanges": [{ "text": "class Dog\nend\n" }],
        });
        must_some(did_change(&mut server, &change));
        assert_eq!(server.documents().get("file:///a.cr").map(|d| d.text.as_str()), Some("class Dog\nend\n"));
    }

    #[test]
    fn did_close_removes_the_document() {
        let (_dir, mut server) = server();
        let open = json!({
            "textDocument": { "uri": "file:///a.cr", "languageId": "crystal", "version": 1, "text": "x\n" }
        });
        must_some(did_open(&mut server, &open));
        did_close(&mut server, &json!({ "textDocument": { "uri": "file:///a.cr" } }));
        assert!(server.documents().get("file:///a.cr").is_none());
    }

    #[test]
    fn signature_help_is_always_null() {
        let (_dir, server) = server();
        assert_eq!(signature_help(&server, &json!({})), Value::Null);
    }

    #[test]
    fn initialize_reroots_the_server_from_root_uri() {
        let (dir, mut server) = server();
        let other = must(tempfile::tempdir());
        let uri = liger_uri::path_to_uri(other.path());
        initialize(&mut server, &json!({ "rootUri": uri }));
        assert_eq!(server.root(), other.path());
        assert!(other.path().join(".liger-cache").is_dir());
        let _ = dir; // keep the original tempdir alive for the duration of the test
    }
}
