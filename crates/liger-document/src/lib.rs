//! In-memory mirror of every open text document, with the incremental-edit
//! splice algorithm from spec.md §4.C.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use liger_position::{LineIndex, Position};
use rustc_hash::FxHashMap;

/// A single open document: its URI, declared language, version counter,
/// full text, and the line index derived from that text.
///
/// The line index is recomputed from `text` after every mutation; it is
/// never allowed to drift out of sync, per spec.md §8's core invariant.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document's `file://` URI, as given at `open`.
    pub uri: String,
    /// The client-declared language identifier (e.g. `"crystal"`).
    pub language_id: String,
    /// Monotonic version counter, set by the client on every change.
    pub version: i64,
    /// Full current text of the document.
    pub text: String,
    /// Line index over `text`, rebuilt after every change.
    pub line_index: LineIndex,
}

impl Document {
    fn new(uri: String, language_id: String, version: i64, text: String) -> Self {
        let line_index = LineIndex::new(&text);
        Self { uri, language_id, version, text, line_index }
    }

    fn reindex(&mut self) {
        self.line_index = LineIndex::new(&self.text);
    }
}

/// One incremental text change, as received from `textDocument/didChange`.
///
/// `range` is `None` for a full-document replace; `Some` for a ranged
/// splice applied against the document's prior text.
#[derive(Debug, Clone)]
pub struct TextChange {
    /// The span being replaced, or `None` to replace the whole document.
    pub range: Option<(Position, Position)>,
    /// The replacement text.
    pub text: String,
}

impl TextChange {
    /// A full-document replace.
    pub fn full(text: impl Into<String>) -> Self {
        Self { range: None, text: text.into() }
    }

    /// A ranged splice between `start` and `end`.
    pub fn ranged(start: Position, end: Position, text: impl Into<String>) -> Self {
        Self { range: Some((start, end)), text: text.into() }
    }
}

/// The live set of open documents, keyed by URI.
///
/// `didChange`/`didClose`/`didSave` for a URI not currently open are
/// tolerated as no-ops, per spec.md §4.C and §8.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: FxHashMap<String, Document>,
}

impl DocumentStore {
    /// An empty store.
    pub fn new() -> Self {
        Self { documents: FxHashMap::default() }
    }

    /// Register a newly opened document, replacing any prior entry for the
    /// same URI.
    pub fn open(&mut self, uri: impl Into<String>, language_id: impl Into<String>, version: i64, text: impl Into<String>) {
        let uri = uri.into();
        let doc = Document::new(uri.clone(), language_id.into(), version, text.into());
        self.documents.insert(uri, doc);
    }

    /// Apply a batch of changes to the document at `uri`, in order, and set
    /// its version to `version`. A no-op if `uri` is not open.
    pub fn change(&mut self, uri: &str, version: i64, changes: &[TextChange]) {
        let Some(doc) = self.documents.get_mut(uri) else { return };
        for change in changes {
            apply_change(doc, change);
        }
        doc.version = version;
    }

    /// Remove the document at `uri`. A no-op if it is not open.
    pub fn close(&mut self, uri: &str) {
        self.documents.remove(uri);
    }

    /// Borrow the document at `uri`, if open.
    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// All open documents, in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Number of currently open documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True iff no documents are open.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn apply_change(doc: &mut Document, change: &TextChange) {
    let Some((start, end)) = change.range else {
        doc.text = change.text.clone();
        doc.reindex();
        return;
    };

    let lines: Vec<&str> = doc.text.split('\n').collect();
    let last = lines.len() - 1;

    let s_line = start.line as usize;
    let s_col = start.character as usize;
    let e_line = end.line as usize;
    let e_col = end.character as usize;

    let mut prefix = String::new();
    if s_line > 0 {
        let take = s_line.min(lines.len());
        prefix.push_str(&lines[..take].join("\n"));
        prefix.push('\n');
    }
    if s_line < lines.len() {
        let line = lines[s_line];
        let col = utf16_col_to_byte(line, s_col);
        prefix.push_str(&line[..col]);
    }

    let mut suffix = String::new();
    if e_line < lines.len() {
        let line = lines[e_line];
        let col = utf16_col_to_byte(line, e_col);
        suffix.push_str(&line[col..]);
    }
    if e_line < last {
        suffix.push('\n');
        let from = (e_line + 1).min(lines.len());
        suffix.push_str(&lines[from..].join("\n"));
    }

    doc.text = format!("{prefix}{}{suffix}", change.text);
    doc.reindex();
}

fn utf16_col_to_byte(line: &str, col: usize) -> usize {
    let mut units = 0usize;
    let mut byte = 0usize;
    for ch in line.chars() {
        if units >= col {
            break;
        }
        units += ch.len_utf16();
        byte += ch.len_utf8();
    }
    byte
}
