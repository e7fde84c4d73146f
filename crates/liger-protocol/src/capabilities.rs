//! Server capability advertisement for the `initialize` response.

use serde_json::{Value, json};

/// Build the `capabilities` object the server advertises in response to
/// `initialize`, per spec.md §6.
pub fn server_capabilities() -> Value {
    json!({
        "textDocumentSync": 1,
        "hoverProvider": true,
        "completionProvider": {
            "triggerCharacters": [".", ":", "@"],
            "resolveProvider": false
        },
        "signatureHelpProvider": {
            "triggerCharacters": ["(", ","]
        },
        "definitionProvider": true,
        "referencesProvider": true,
        "documentSymbolProvider": true,
        "workspaceSymbolProvider": true,
        "renameProvider": {
            "prepareProvider": true
        }
    })
}
