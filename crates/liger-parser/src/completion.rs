//! File-local completion items, per spec.md §4.E.
//!
//! This is the parser adapter's contribution only: keywords, built-in type
//! names, and names pulled straight out of the current file. Receiver-type
//! inference and workspace-wide completion live in `liger-analyzer`.

use crate::scanner::{classify, LineMatch};
use liger_position::{LineIndex, Position};
use lsp_types::{CompletionItem, CompletionItemKind};
use std::collections::HashSet;

/// Crystal reserved words offered outside of a `.`/`::` completion context.
pub const KEYWORDS: &[&str] = &[
    "abstract", "alias", "and", "as", "as?", "asm", "begin", "break", "case", "class", "def",
    "do", "else", "elsif", "end", "ensure", "enum", "extend", "false", "for", "fun", "if",
    "in", "include", "is_a?", "lib", "macro", "module", "next", "nil", "not", "of", "or",
    "out", "pointerof", "private", "protected", "property", "getter", "setter", "require",
    "rescue", "responds_to?", "return", "select", "self", "sizeof", "struct", "super", "then",
    "true", "type", "typeof", "uninitialized", "union", "unless", "until", "when", "while",
    "with", "yield",
];

/// Built-in type names offered outside of a `.`/`::` completion context,
/// and the full set emitted for a `Foo::` prefix.
pub const BUILTIN_TYPES: &[&str] = &[
    "String", "Int8", "Int16", "Int32", "Int64", "UInt8", "UInt16", "UInt32", "UInt64",
    "Float32", "Float64", "Bool", "Char", "Symbol", "Array", "Hash", "Set", "Range", "Regex",
    "Tuple", "NamedTuple", "Proc", "Nil", "Object", "Time", "File", "IO", "Exception",
];

/// Common methods offered whenever the cursor follows a `.`.
pub const COMMON_METHODS: &[&str] = &[
    "to_s", "to_i", "to_f", "inspect", "class", "nil?", "is_a?", "responds_to?", "each",
    "size", "empty?", "dup", "clone", "hash", "==",
];

fn item(label: &str, kind: CompletionItemKind) -> CompletionItem {
    CompletionItem { label: label.to_string(), kind: Some(kind), ..Default::default() }
}

/// Build file-local completion items for `text` at `pos`.
pub fn completions(text: &str, pos: Position) -> Vec<CompletionItem> {
    let index = LineIndex::new(text);
    let offset = index.position_to_offset(text, pos);
    let before = text[..offset.min(text.len())].chars().next_back();

    if before == Some('.') {
        return COMMON_METHODS.iter().map(|m| item(m, CompletionItemKind::METHOD)).collect();
    }

    let mut out: Vec<CompletionItem> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for kw in KEYWORDS {
        if seen.insert(kw.to_string()) {
            out.push(item(kw, CompletionItemKind::KEYWORD));
        }
    }
    for ty in BUILTIN_TYPES {
        if seen.insert(ty.to_string()) {
            out.push(item(ty, CompletionItemKind::CLASS));
        }
    }
    for (name, kind) in file_local_names(text) {
        if seen.insert(name.clone()) {
            out.push(item(&name, kind));
        }
    }

    out
}

fn file_local_names(text: &str) -> Vec<(String, CompletionItemKind)> {
    let mut out = Vec::new();
    for line in text.lines() {
        match classify(line) {
            Some(LineMatch::Class { name, .. }) => out.push((name, CompletionItemKind::CLASS)),
            Some(LineMatch::Module { name, .. }) => out.push((name, CompletionItemKind::MODULE)),
            Some(LineMatch::Struct { name, .. }) => out.push((name, CompletionItemKind::STRUCT)),
            Some(LineMatch::Enum { name, .. }) => out.push((name, CompletionItemKind::ENUM)),
            Some(LineMatch::Method { name, .. }) => out.push((name, CompletionItemKind::METHOD)),
            _ => {}
        }
    }
    out
}
