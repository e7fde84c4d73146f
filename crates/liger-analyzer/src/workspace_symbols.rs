//! `workspace/symbol`, per spec.md §4.G.
//!
//! Delegates the substring search itself to
//! [`liger_workspace_index::WorkspaceIndex::search_symbols`]; this module's
//! only job is translating `SymbolInfo` records into wire
//! `SymbolInformation`. Per spec.md §9 / REDESIGN FLAGS, result ordering is
//! unspecified — clients must not depend on it.

use crate::Analyzer;
use liger_oracle::Subprocess;
use liger_symbol::{SymbolInfo, SymbolKind as LigerKind};
use liger_uri::path_to_uri;
use lsp_types::{Location, SymbolInformation, SymbolKind as LspSymbolKind, Url};

#[allow(deprecated)] // `SymbolInformation::deprecated` itself carries the attribute
pub(crate) fn workspace_symbols<S: Subprocess>(analyzer: &Analyzer<S>, query: &str) -> Vec<SymbolInformation> {
    analyzer.index.search_symbols(query).into_iter().filter_map(to_wire).collect()
}

#[allow(deprecated)]
fn to_wire(sym: SymbolInfo) -> Option<SymbolInformation> {
    let uri = path_to_uri(&sym.file);
    let url = Url::parse(&uri).ok()?;
    let pos = lsp_types::Position { line: sym.line, character: 0 };
    let location = Location { uri: url, range: lsp_types::Range { start: pos, end: pos } };
    let container_name = sym.is_qualified().then(|| {
        let (container, _) = sym.name.rsplit_once("::").unwrap_or(("", ""));
        container.to_string()
    });
    Some(SymbolInformation {
        name: sym.simple_name().to_string(),
        kind: lsp_kind(sym.kind),
        tags: None,
        deprecated: None,
        location,
        container_name,
    })
}

fn lsp_kind(kind: LigerKind) -> LspSymbolKind {
    match kind {
        LigerKind::Class | LigerKind::Alias => LspSymbolKind::CLASS,
        LigerKind::Module | LigerKind::Lib => LspSymbolKind::MODULE,
        LigerKind::Struct => LspSymbolKind::STRUCT,
        LigerKind::Enum => LspSymbolKind::ENUM,
        LigerKind::EnumMember => LspSymbolKind::ENUM_MEMBER,
        LigerKind::Fun | LigerKind::Method => LspSymbolKind::METHOD,
        LigerKind::Property | LigerKind::Getter | LigerKind::Setter => LspSymbolKind::PROPERTY,
        LigerKind::InstanceVariable => LspSymbolKind::FIELD,
        LigerKind::Variable => LspSymbolKind::VARIABLE,
        LigerKind::Constant => LspSymbolKind::CONSTANT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixture;

    #[test]
    fn substring_query_matches_case_insensitively() {
        let (dir, documents, index, oracle) = fixture(&[("a.cr", "class DogHouse\nend\n")]);
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let hits = analyzer.workspace_symbols("doghouse");
        assert!(hits.iter().any(|s| s.name == "DogHouse"));
    }

    #[test]
    fn empty_query_matches_every_symbol() {
        let (dir, documents, index, oracle) = fixture(&[("a.cr", "class A\nend\nclass B\nend\n")]);
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let hits = analyzer.workspace_symbols("");
        assert!(hits.iter().any(|s| s.name == "A"));
        assert!(hits.iter().any(|s| s.name == "B"));
    }

    #[test]
    fn nested_symbol_carries_its_enclosing_namespace_as_container() {
        let (dir, documents, index, oracle) =
            fixture(&[("a.cr", "module M\n  class Inner\n  end\nend\n")]);
        let analyzer = Analyzer::new(&documents, &index, &oracle, dir.path());
        let hits = analyzer.workspace_symbols("Inner");
        let qualified = hits.iter().find(|s| s.container_name.as_deref() == Some("M"));
        assert!(qualified.is_some());
    }
}
