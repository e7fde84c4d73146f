//! End-to-end dispatch loop tests, driven over an in-memory reader/writer
//! pair with a `MockSubprocess` standing in for `crystal`.

use liger_lsp::LspServer;
use liger_oracle::subprocess::mock::MockSubprocess;
use liger_tdd_support::{must, must_some};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Cursor};

fn frame(body: &Value) -> String {
    let body = body.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

fn responses(raw: &[u8]) -> Vec<Value> {
    let mut reader = BufReader::new(Cursor::new(raw));
    let mut out = Vec::new();
    loop {
        let mut headers = std::collections::HashMap::new();
        loop {
            let mut line = String::new();
            if must(reader.read_line(&mut line)) == 0 {
                return out;
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            let (k, v) = must_some(line.split_once(':'));
            headers.insert(k.trim().to_string(), v.trim().to_string());
        }
        let len: usize = must(must_some(headers.get("Content-Length")).parse());
        let mut content = vec![0u8; len];
        must(std::io::Read::read_exact(&mut reader, &mut content));
        out.push(must(serde_json::from_slice(&content)));
    }
}

#[test]
fn full_session_initialize_open_definition_shutdown_exit() {
    let dir = must(tempfile::tempdir());
    must(std::fs::write(dir.path().join("dog.cr"), "class Dog\n  def bark\n  end\nend\n"));
    let root_uri = liger_uri::path_to_uri(dir.path());

    let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());

    let init = json!({
        "jsonrpc": "2.0", "id": 1, "method": "initialize",
        "params": { "rootUri": root_uri, "capabilities": {} },
    });
    let open = json!({
        "jsonrpc": "2.0", "method": "textDocument/didOpen",
        "params": {
            "textDocument": {
                "uri": "file:///main.cr", "languageId": "crystal", "version": 1,
                "text": "d = Dog.new\nd.bark\n",
            },
        },
    });
    let definition = json!({
        "jsonrpc": "2.0", "id": 2, "method": "textDocument/definition",
        "params": {
            "textDocument": { "uri": "file:///main.cr" },
            "position": { "line": 1, "character": 3 },
        },
    });
    let shutdown = json!({ "jsonrpc": "2.0", "id": 3, "method": "shutdown" });
    let exit = json!({ "jsonrpc": "2.0", "method": "exit" });

    let input = [&init, &open, &definition, &shutdown, &exit].iter().map(|m| frame(m)).collect::<String>();
    let mut reader = BufReader::new(Cursor::new(input));
    let mut output = Vec::new();

    let code = liger_lsp::run_loop(&mut server, &mut reader, &mut output);
    assert_eq!(code, 0);

    let replies = responses(&output);

    let init_reply = &replies[0];
    assert_eq!(init_reply["id"], 1);
    assert!(init_reply["result"]["capabilities"].is_object());

    let has_diagnostics_notification = replies.iter().any(|m| m["method"] == "textDocument/publishDiagnostics");
    assert!(has_diagnostics_notification);

    let definition_reply = must_some(replies.iter().find(|m| m["id"] == 2));
    assert!(definition_reply["result"]["uri"].as_str().unwrap_or("").ends_with("dog.cr"));

    let shutdown_reply = must_some(replies.iter().find(|m| m["id"] == 3));
    assert_eq!(shutdown_reply["result"], Value::Null);
}

#[test]
fn requests_before_initialize_are_rejected() {
    let dir = must(tempfile::tempdir());
    let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());

    let hover = json!({
        "jsonrpc": "2.0", "id": 1, "method": "textDocument/hover",
        "params": { "textDocument": { "uri": "file:///a.cr" }, "position": { "line": 0, "character": 0 } },
    });
    let exit = json!({ "jsonrpc": "2.0", "method": "exit" });
    let input = [&hover, &exit].iter().map(|m| frame(m)).collect::<String>();
    let mut reader = BufReader::new(Cursor::new(input));
    let mut output = Vec::new();

    liger_lsp::run_loop(&mut server, &mut reader, &mut output);

    let replies = responses(&output);
    assert_eq!(replies[0]["error"]["code"], -32002);
}

#[test]
fn unknown_method_yields_method_not_found_after_initialize() {
    let dir = must(tempfile::tempdir());
    let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());

    let init = json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} });
    let bogus = json!({ "jsonrpc": "2.0", "id": 2, "method": "textDocument/bogus", "params": {} });
    let exit = json!({ "jsonrpc": "2.0", "method": "exit" });
    let input = [&init, &bogus, &exit].iter().map(|m| frame(m)).collect::<String>();
    let mut reader = BufReader::new(Cursor::new(input));
    let mut output = Vec::new();

    liger_lsp::run_loop(&mut server, &mut reader, &mut output);

    let replies = responses(&output);
    let bogus_reply = must_some(replies.iter().find(|m| m["id"] == 2));
    assert_eq!(bogus_reply["error"]["code"], -32601);
}
