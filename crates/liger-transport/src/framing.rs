//! Message framing for the LSP Base Protocol.

use liger_protocol::{JsonRpcRequest, JsonRpcResponse};
use std::collections::HashMap;
use std::io::{self, BufRead, Read, Write};

/// Read one LSP message from a buffered reader.
///
/// Returns `Ok(None)` on clean EOF, and also on a malformed body — a
/// parse failure here is recoverable for the dispatch loop, which simply
/// reads the next message; it is not an I/O error.
///
/// Returns `Err` only when the underlying reader itself fails.
pub fn read_message<R: BufRead>(reader: &mut R) -> io::Result<Option<JsonRpcRequest>> {
    let mut headers = HashMap::new();

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None); // EOF
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    let Some(content_length) = headers.get("Content-Length") else {
        return Ok(None);
    };
    let Ok(length) = content_length.parse::<usize>() else {
        return Ok(None);
    };

    let mut content = vec![0u8; length];
    let mut read_so_far = 0;
    while read_so_far < length {
        match reader.read(&mut content[read_so_far..])? {
            0 => return Ok(None), // unexpected EOF mid-body
            n => read_so_far += n,
        }
    }

    match serde_json::from_slice(&content) {
        Ok(request) => Ok(Some(request)),
        Err(e) => {
            eprintln!("[liger] malformed JSON-RPC frame: {e}");
            Ok(None)
        }
    }
}

/// Write a response, framed with `Content-Length`, and flush the writer.
pub fn write_message<W: Write>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()> {
    let body = serde_json::to_string(response)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", body.len(), body)?;
    writer.flush()
}

/// Write a server-to-client notification, framed with `Content-Length`.
pub fn write_notification<W: Write>(
    writer: &mut W,
    method: &str,
    params: serde_json::Value,
) -> io::Result<()> {
    let body = serde_json::to_string(&serde_json::json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
    }))?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", body.len(), body)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::{must, must_some};
    use std::io::{BufReader, Cursor};

    fn frame(body: &str) -> String {
        format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
    }

    #[test]
    fn reads_a_well_formed_request() {
        let raw = frame(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        let mut reader = BufReader::new(Cursor::new(raw));
        let msg = must_some(must(read_message(&mut reader)));
        assert_eq!(msg.method, "initialize");
        assert!(msg.is_request());
    }

    #[test]
    fn reads_a_notification_with_no_id() {
        let raw = frame(r#"{"jsonrpc":"2.0","method":"initialized","params":{}}"#);
        let mut reader = BufReader::new(Cursor::new(raw));
        let msg = must_some(must(read_message(&mut reader)));
        assert!(!msg.is_request());
    }

    #[test]
    fn eof_on_empty_input_returns_none() {
        let mut reader = BufReader::new(Cursor::new(""));
        assert!(must(read_message(&mut reader)).is_none());
    }

    #[test]
    fn malformed_json_body_is_recoverable_not_an_io_error() {
        let raw = frame("not json");
        let mut reader = BufReader::new(Cursor::new(raw));
        assert!(must(read_message(&mut reader)).is_none());
    }

    #[test]
    fn ignores_unrelated_headers() {
        let body = r#"{"jsonrpc":"2.0","id":2,"method":"shutdown"}"#;
        let raw = format!(
            "Content-Type: application/vscode-jsonrpc\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let mut reader = BufReader::new(Cursor::new(raw));
        let msg = must_some(must(read_message(&mut reader)));
        assert_eq!(msg.method, "shutdown");
    }

    #[test]
    fn write_message_measures_utf8_bytes_not_chars() {
        let mut buf = Vec::new();
        let resp = JsonRpcResponse::success(
            Some(serde_json::Value::from(1)),
            serde_json::Value::from("héllo"),
        );
        must(write_message(&mut buf, &resp));
        let text = must(String::from_utf8(buf));
        let (header, body) = must_some(text.split_once("\r\n\r\n"));
        let declared: usize = must(must_some(header.strip_prefix("Content-Length: ")).parse());
        assert_eq!(declared, body.len());
        assert_ne!(declared, body.chars().count());
    }

    #[test]
    fn round_trip_write_then_read() {
        let mut buf = Vec::new();
        let resp = JsonRpcResponse::success(
            Some(serde_json::Value::from(7)),
            serde_json::Value::from("ok"),
        );
        must(write_message(&mut buf, &resp));
        let mut reader = BufReader::new(Cursor::new(buf));
        let msg = must_some(must(read_message(&mut reader)));
        assert_eq!(msg.id, Some(serde_json::Value::from(7)));
    }
}
