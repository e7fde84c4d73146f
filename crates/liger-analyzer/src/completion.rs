//! `textDocument/completion`, per spec.md §4.F.
//!
//! Dispatches on what precedes the cursor: a `receiver.` or `receiver.partial`
//! prefix offers that receiver's methods (workspace-inferred type, plus the
//! always-present common methods); a `Foo::` prefix offers built-in type
//! names; otherwise file-local completion is augmented with every indexed
//! workspace symbol.

use crate::receiver::{char_at_utf16_col, infer_receiver_type, receiver_prefix_at};
use crate::Analyzer;
use liger_oracle::Subprocess;
use liger_parser::completion::{BUILTIN_TYPES, COMMON_METHODS};
use liger_position::{word_utf16_range, Position};
use liger_symbol::SymbolKind;
use liger_uri::uri_to_path;
use lsp_types::{CompletionItem, CompletionItemKind};
use std::collections::HashSet;

pub(crate) fn completion<S: Subprocess>(analyzer: &Analyzer<S>, uri: &str, pos: Position) -> Vec<CompletionItem> {
    let Some(doc) = analyzer.documents.get(uri) else { return Vec::new() };
    let Some(line) = doc.text.lines().nth(pos.line as usize) else { return Vec::new() };

    if let Some((receiver, partial)) = receiver_prefix_at(line, pos.character) {
        let file = uri_to_path(uri);
        let mut labels: Vec<String> = file
            .as_deref()
            .and_then(|file| infer_receiver_type(analyzer.index, file, &doc.text, &receiver, pos.line))
            .map(|ty| analyzer.index.completions_for_receiver(&ty))
            .unwrap_or_default();
        labels.extend(COMMON_METHODS.iter().map(|m| m.to_string()));
        return dedup_items(
            labels
                .into_iter()
                .filter(|m| m.starts_with(&partial))
                .map(|m| item(&m, CompletionItemKind::METHOD)),
        );
    }

    if is_scope_prefix(line, pos.character) {
        return dedup_items(BUILTIN_TYPES.iter().map(|t| item(t, CompletionItemKind::CLASS)));
    }

    let mut items = liger_parser::completions_at(&doc.text, pos);
    for sym in analyzer.index.search_symbols("") {
        items.push(item(sym.simple_name(), completion_kind(sym.kind)));
    }
    dedup_items(items)
}

fn is_scope_prefix(line: &str, character: u32) -> bool {
    if let Some((start, _)) = word_utf16_range(line, character) {
        return start >= 2
            && char_at_utf16_col(line, start - 1) == Some(':')
            && char_at_utf16_col(line, start - 2) == Some(':');
    }
    character >= 2
        && char_at_utf16_col(line, character - 1) == Some(':')
        && char_at_utf16_col(line, character - 2) == Some(':')
}

fn completion_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Class => CompletionItemKind::CLASS,
        SymbolKind::Module | SymbolKind::Lib => CompletionItemKind::MODULE,
        SymbolKind::Struct => CompletionItemKind::STRUCT,
        SymbolKind::Enum => CompletionItemKind::ENUM,
        SymbolKind::EnumMember => CompletionItemKind::ENUM_MEMBER,
        SymbolKind::Fun | SymbolKind::Method => CompletionItemKind::METHOD,
        SymbolKind::Property | SymbolKind::Getter | SymbolKind::Setter | SymbolKind::InstanceVariable => {
            CompletionItemKind::FIELD
        }
        SymbolKind::Variable => CompletionItemKind::VARIABLE,
        SymbolKind::Constant => CompletionItemKind::CONSTANT,
        SymbolKind::Alias => CompletionItemKind::CLASS,
    }
}

fn item(label: &str, kind: CompletionItemKind) -> CompletionItem {
    CompletionItem { label: label.to_string(), kind: Some(kind), ..Default::default() }
}

fn dedup_items(items: impl IntoIterator<Item = CompletionItem>) -> Vec<CompletionItem> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.label.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixture;

    #[test]
    fn dot_prefix_offers_receiver_methods_and_common_methods() {
        let (dir, mut documents, index, oracle) = fixture(&[("dog.cr", "class Dog\n  def bark\n  end\nend\n")]);
        documents.open("file:///main.cr", "crystal", 1, "d = Dog.new\nd.\n");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let items = analyzer.completion("file:///main.cr", Position::new(1, 2));
        assert!(items.iter().any(|i| i.label == "bark"));
        assert!(items.iter().any(|i| i.label == "to_s"));
    }

    #[test]
    fn partial_method_prefix_filters_candidates() {
        let (dir, mut documents, index, oracle) = fixture(&[]);
        documents.open("file:///main.cr", "crystal", 1, "arr = [1]\narr.ea\n");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let items = analyzer.completion("file:///main.cr", Position::new(1, 6));
        assert!(items.iter().all(|i| i.label.starts_with("ea")));
        assert!(items.iter().any(|i| i.label == "each"));
    }

    #[test]
    fn scope_prefix_offers_builtin_types() {
        let (dir, mut documents, index, oracle) = fixture(&[]);
        documents.open("file:///main.cr", "crystal", 1, "Foo::\n");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let items = analyzer.completion("file:///main.cr", Position::new(0, 5));
        assert!(items.iter().any(|i| i.label == "String"));
    }

    #[test]
    fn bare_prefix_includes_keywords_and_workspace_symbols() {
        let (dir, mut documents, index, oracle) = fixture(&[("dog.cr", "class Dog\nend\n")]);
        documents.open("file:///main.cr", "crystal", 1, "");
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let items = analyzer.completion("file:///main.cr", Position::new(0, 0));
        assert!(items.iter().any(|i| i.label == "def"));
        assert!(items.iter().any(|i| i.label == "Dog"));
    }
}
