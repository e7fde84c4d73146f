//! `textDocument/rename` and `textDocument/prepareRename`, per spec.md §4.F.
//!
//! Whole-word, single-document rename: every occurrence of the word under
//! the cursor, anywhere in the current document's text, becomes one
//! `TextEdit`. Cross-file rename is out of scope (spec.md §1 Non-goals).

use crate::Analyzer;
use liger_oracle::Subprocess;
use liger_position::{get_word_at_position, iter_words, Position};
use lsp_types::{OneOf, TextDocumentEdit, TextEdit, Url, VersionedTextDocumentIdentifier, WorkspaceEdit};
use std::collections::HashMap;

/// `word_utf16_range`/`iter_words` already report half-open UTF-16 spans,
/// matching the wire format directly, so this builds an `lsp_types::Range`
/// without going through `liger_protocol::convert::lsp_range` (which expects
/// an inclusive-end internal `Range` and would double-offset the end here).
fn wire_range(line: u32, start: u32, end: u32) -> lsp_types::Range {
    lsp_types::Range {
        start: lsp_types::Position { line, character: start },
        end: lsp_types::Position { line, character: end },
    }
}

pub(crate) fn prepare_rename<S: Subprocess>(
    analyzer: &Analyzer<S>,
    uri: &str,
    pos: Position,
) -> Option<lsp_types::Range> {
    let doc = analyzer.documents.get(uri)?;
    let line = doc.text.lines().nth(pos.line as usize)?;
    let (start, end) = liger_position::word_utf16_range(line, pos.character)?;
    Some(wire_range(pos.line, start, end))
}

pub(crate) fn rename<S: Subprocess>(
    analyzer: &Analyzer<S>,
    uri: &str,
    pos: Position,
    new_name: &str,
) -> Option<WorkspaceEdit> {
    let doc = analyzer.documents.get(uri)?;
    let line = doc.text.lines().nth(pos.line as usize)?;
    let target = get_word_at_position(line, pos.character)?;

    let mut edits = Vec::new();
    for (line_no, text_line) in doc.text.lines().enumerate() {
        for (word, start, end) in iter_words(text_line) {
            if word == target {
                edits.push(TextEdit { range: wire_range(line_no as u32, start, end), new_text: new_name.to_string() });
            }
        }
    }
    if edits.is_empty() {
        return None;
    }

    let url = Url::parse(uri).ok()?;
    let mut changes = HashMap::new();
    changes.insert(url.clone(), edits.clone());

    Some(WorkspaceEdit {
        changes: Some(changes),
        document_changes: Some(lsp_types::DocumentChanges::Edits(vec![TextDocumentEdit {
            text_document: VersionedTextDocumentIdentifier { uri: url, version: doc.version },
            edits: edits.into_iter().map(OneOf::Left).collect(),
        }])),
        change_annotations: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixture;
    use liger_tdd_support::must_some;

    #[test]
    fn renames_every_occurrence_of_the_word_under_the_cursor() {
        let (dir, mut documents, index, oracle) = fixture(&[]);
        documents.open("file:///a.cr", "crystal", 1, "foo = 1\nbar = foo + foo");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let edit = must_some(analyzer.rename("file:///a.cr", Position::new(1, 6), "qux"));
        let url = must_some(Url::parse("file:///a.cr").ok());
        let changes = must_some(edit.changes);
        let edits = must_some(changes.get(&url).cloned());
        assert_eq!(edits.len(), 3);
        assert_eq!((edits[0].range.start.line, edits[0].range.start.character), (0, 0));
        assert_eq!((edits[0].range.end.line, edits[0].range.end.character), (0, 3));
        assert_eq!((edits[1].range.start.character, edits[1].range.end.character), (6, 9));
        assert_eq!((edits[2].range.start.character, edits[2].range.end.character), (12, 15));
        assert!(edits.iter().all(|e| e.new_text == "qux"));
    }

    #[test]
    fn prepare_rename_returns_the_word_span() {
        let (dir, mut documents, index, oracle) = fixture(&[]);
        documents.open("file:///a.cr", "crystal", 1, "foo = 1");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let range = must_some(analyzer.prepare_rename("file:///a.cr", Position::new(0, 1)));
        assert_eq!((range.start.character, range.end.character), (0, 3));
    }

    #[test]
    fn renaming_whitespace_yields_no_edit() {
        let (dir, mut documents, index, oracle) = fixture(&[]);
        documents.open("file:///a.cr", "crystal", 1, "foo bar");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        assert!(analyzer.rename("file:///a.cr", Position::new(0, 3), "x").is_none());
    }
}
