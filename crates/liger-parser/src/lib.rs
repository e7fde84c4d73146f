//! Line-based Crystal syntax scanning: diagnostics, document symbols, and
//! file-local completions, per spec.md §4.E.
//!
//! There is no ambient `crystal-parser` crate to lean on, so this crate is
//! itself the "parser": a compiled-regex tokenizer over `class`/`module`/
//! `end`-style indentation, in the manner spec.md §9 recommends. It
//! deliberately stops short of a full Crystal grammar (macros, generics,
//! and most expression forms are unmodeled) — that limitation is the
//! Non-goal of full semantic type inference carried forward from spec.md §1.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod diagnostics;
pub mod document_symbol;
pub mod scanner;
mod symbols;

pub use symbols::extract_symbols;

use liger_position::Position;
use lsp_types::{CompletionItem, Diagnostic, DocumentSymbol};

/// The result of parsing one document: syntax diagnostics and its nested
/// document-symbol tree.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Syntax diagnostics; empty on a clean parse.
    pub diagnostics: Vec<Diagnostic>,
    /// The nested `class`/`module`/`struct`/`enum`/`def`/variable tree.
    pub document_symbols: Vec<DocumentSymbol>,
}

/// Parse `text`, producing diagnostics and the document-symbol tree.
pub fn parse(text: &str) -> ParseResult {
    ParseResult {
        diagnostics: diagnostics::check(text),
        document_symbols: document_symbol::document_symbols(text),
    }
}

/// File-local completion items for `text` at `pos`; see
/// [`completion::completions`] for the dispatch rule.
pub fn completions_at(text: &str, pos: Position) -> Vec<CompletionItem> {
    completion::completions(text, pos)
}
