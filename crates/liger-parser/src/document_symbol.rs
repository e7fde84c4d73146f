//! Nested `DocumentSymbol` tree construction, per spec.md §4.E.
//!
//! Only six declaration forms participate: `class`, `module`, `struct`,
//! `enum`, `def`, and a bare top-level variable assignment. Nesting is
//! derived from indentation rather than `end`-matching, which handles the
//! common well-formed case (including the nested module/class/def scenario
//! spec.md §8 tests) without needing a second block-tracking pass.

use crate::scanner::{classify, classify_variable, LineMatch};
use liger_symbol::SymbolKind as LigerKind;
use lsp_types::{DocumentSymbol, Position, Range, SymbolKind};

struct Building {
    name: String,
    kind: SymbolKind,
    indent: usize,
    start_line: u32,
    name_col: u32,
    children: Vec<DocumentSymbol>,
}

#[allow(deprecated)]
fn finish(b: Building, end_line: u32) -> DocumentSymbol {
    let selection_start = Position { line: b.start_line, character: b.name_col };
    let selection_end =
        Position { line: b.start_line, character: b.name_col + b.name.chars().count() as u32 };
    DocumentSymbol {
        name: b.name,
        detail: None,
        kind: b.kind,
        tags: None,
        deprecated: None,
        range: Range { start: Position { line: b.start_line, character: 0 }, end: Position { line: end_line, character: 0 } },
        selection_range: Range { start: selection_start, end: selection_end },
        children: if b.children.is_empty() { None } else { Some(b.children) },
    }
}

fn lsp_kind(k: LigerKind) -> SymbolKind {
    match k {
        LigerKind::Class | LigerKind::Alias => SymbolKind::CLASS,
        LigerKind::Module | LigerKind::Lib => SymbolKind::MODULE,
        LigerKind::Struct => SymbolKind::STRUCT,
        LigerKind::Enum => SymbolKind::ENUM,
        LigerKind::EnumMember => SymbolKind::ENUM_MEMBER,
        LigerKind::Fun | LigerKind::Method => SymbolKind::METHOD,
        LigerKind::Property | LigerKind::Getter | LigerKind::Setter => SymbolKind::PROPERTY,
        LigerKind::InstanceVariable => SymbolKind::FIELD,
        LigerKind::Variable => SymbolKind::VARIABLE,
        LigerKind::Constant => SymbolKind::CONSTANT,
    }
}

/// Walk `text` and build the nested `DocumentSymbol` tree for `class`,
/// `module`, `struct`, `enum`, `def`, and top-level variable assignments.
pub fn document_symbols(text: &str) -> Vec<DocumentSymbol> {
    let mut roots: Vec<DocumentSymbol> = Vec::new();
    let mut stack: Vec<Building> = Vec::new();
    let mut last_line = 0u32;

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no as u32;
        last_line = line_no;

        let candidate = match classify(line) {
            Some(LineMatch::Class { indent, name }) => Some((indent, name, SymbolKind::CLASS)),
            Some(LineMatch::Module { indent, name }) => Some((indent, name, SymbolKind::MODULE)),
            Some(LineMatch::Struct { indent, name }) => Some((indent, name, SymbolKind::STRUCT)),
            Some(LineMatch::Enum { indent, name }) => Some((indent, name, SymbolKind::ENUM)),
            Some(LineMatch::Method { indent, name, .. }) => Some((indent, name, SymbolKind::METHOD)),
            _ => classify_variable(line)
                .filter(|(indent, ..)| *indent == 0 && stack.is_empty())
                .map(|(indent, name, _)| (indent, name, SymbolKind::VARIABLE)),
        };

        let Some((indent, name, kind)) = candidate else { continue };

        while stack.last().is_some_and(|top| top.indent >= indent) {
            let Some(done) = stack.pop() else { break };
            let node = finish(done, line_no);
            push(&mut stack, &mut roots, node);
        }

        let name_col = line.find(name.as_str()).unwrap_or(0) as u32;
        stack.push(Building { name, kind, indent, start_line: line_no, name_col, children: Vec::new() });
    }

    while let Some(done) = stack.pop() {
        let node = finish(done, last_line + 1);
        push(&mut stack, &mut roots, node);
    }

    roots
}

fn push(stack: &mut [Building], roots: &mut Vec<DocumentSymbol>, node: DocumentSymbol) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        roots.push(node);
    }
}
