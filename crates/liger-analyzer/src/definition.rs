//! `textDocument/definition`, per spec.md §4.F's seven-step fallback order.

use crate::receiver::{infer_receiver_type, receiver_method_at};
use crate::{location_in_file, require_path, Analyzer};
use liger_oracle::Subprocess;
use liger_parser::scanner::{classify, LineMatch};
use liger_position::{get_word_at_position, word_utf16_range, Position};
use liger_uri::uri_to_path;
use liger_workspace_index::STDLIB_FALLBACKS;
use lsp_types::Location;
use std::path::PathBuf;

pub(crate) fn goto_definition<S: Subprocess>(
    analyzer: &Analyzer<S>,
    uri: &str,
    pos: Position,
) -> Option<Location> {
    let doc = analyzer.documents.get(uri)?;
    let line = doc.text.lines().nth(pos.line as usize)?;
    let file = uri_to_path(uri)?;

    // Step 1: require-path resolution.
    if let Some(req) = require_path::parse(line) {
        if req.contains(pos.character) {
            let roots = stdlib_roots(analyzer);
            let (resolved, _kind) = require_path::resolve(&req.path, &file, analyzer.root, &roots);
            return resolved.and_then(|r| location_in_file(&r, Position::new(0, 0)));
        }
    }

    // Step 2: fun extern self-reference.
    if let Some(LineMatch::Fun { name, .. }) = classify(line) {
        if let Some(word) = get_word_at_position(line, pos.character) {
            if word == name {
                let (start, _) = word_utf16_range(line, pos.character)?;
                return location_in_file(&file, Position::new(pos.line, start));
            }
        }
    }

    let word = get_word_at_position(line, pos.character)?;
    let bare = word.strip_prefix('@').unwrap_or(&word);

    // Step 3: current-file declaration scan.
    for (line_no, text_line) in doc.text.lines().enumerate() {
        let hit = match classify(text_line) {
            Some(LineMatch::Method { name, .. }) if name == word => true,
            Some(LineMatch::Fun { name, .. }) if name == word => true,
            Some(LineMatch::Class { name, .. }) if name == word => true,
            Some(LineMatch::Module { name, .. }) if name == word => true,
            Some(LineMatch::Struct { name, .. }) if name == word => true,
            Some(LineMatch::Enum { name, .. }) if name == word => true,
            Some(LineMatch::Lib { name, .. }) if name == word => true,
            Some(LineMatch::Alias { name, .. }) if name == word => true,
            Some(LineMatch::Constant { name, .. }) if name == word => true,
            Some(LineMatch::Accessor { name, .. }) if name == bare => true,
            Some(LineMatch::InstanceVariable { name, .. }) if name == bare => true,
            _ => false,
        };
        if hit {
            return location_in_file(&file, Position::new(line_no as u32, 0));
        }
    }

    // Step 4: workspace index exact (and already-qualified) name match.
    if let Some(sym) = analyzer.index.find_symbol_info(&word).into_iter().next() {
        return location_in_file(&sym.file, Position::new(sym.line, 0));
    }

    // Step 5: `@ivar` property/getter/setter lookup.
    if word.starts_with('@') {
        if let Some(sym) = analyzer.index.find_property_definition(&word).into_iter().next() {
            return location_in_file(&sym.file, Position::new(sym.line, 0));
        }
    }

    // Step 6: receiver.method resolution.
    if let Some((receiver, method)) = receiver_method_at(line, pos.character) {
        if let Some(receiver_type) = infer_receiver_type(analyzer.index, &file, &doc.text, &receiver, pos.line) {
            if let Some(sym) = analyzer.index.find_method_definition(&receiver_type, &method) {
                return location_in_file(&sym.file, Position::new(sym.line, 0));
            }
        }
    }

    // Step 7: compiler oracle, last resort.
    let main = analyzer.oracle.main_file(analyzer.root);
    analyzer.oracle.sync_before_call(&file, &doc.text).ok()?;
    let hits = analyzer.oracle.implementations(&file, pos.line + 1, pos.character + 1, main.as_deref()).ok()?;
    let first = hits.into_iter().next()?;
    location_in_file(&first.file, Position::new(first.line.saturating_sub(1), first.column.saturating_sub(1)))
}

fn stdlib_roots<S: Subprocess>(analyzer: &Analyzer<S>) -> Vec<PathBuf> {
    let mut roots = analyzer.oracle.crystal_path_roots();
    if roots.is_empty() {
        roots.extend(STDLIB_FALLBACKS.iter().map(PathBuf::from).filter(|p| p.is_dir()));
    }
    roots
}
