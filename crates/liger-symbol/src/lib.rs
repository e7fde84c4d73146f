//! The Crystal symbol taxonomy (`SymbolKind`) and the flat `SymbolInfo`
//! record that every symbol cache in `liger` is keyed and valued by.
//!
//! This crate is the single source of truth for symbol classification so
//! the parser, workspace index, and semantic analyzer never drift apart on
//! what counts as, say, a `getter` versus a `property`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification of a Crystal symbol, per spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// `class Foo`
    Class,
    /// `module Foo`
    Module,
    /// `struct Foo`
    Struct,
    /// `enum Foo`
    Enum,
    /// A member of an `enum`.
    EnumMember,
    /// `lib Foo` (C binding namespace)
    Lib,
    /// `fun name = cname(...)`
    Fun,
    /// `def name(...)`
    Method,
    /// `property name : T`
    Property,
    /// `getter name : T`
    Getter,
    /// `setter name : T`
    Setter,
    /// `@name : T`
    InstanceVariable,
    /// A top-level variable assignment.
    Variable,
    /// `NAME = expr`
    Constant,
    /// `alias Name = T`
    Alias,
}

impl SymbolKind {
    /// Map to the LSP `SymbolKind` wire integer (LSP 3.17 table).
    pub const fn to_lsp_kind(self) -> u32 {
        match self {
            SymbolKind::Class => 5,
            SymbolKind::Module => 2,
            SymbolKind::Struct => 23,
            SymbolKind::Enum => 10,
            SymbolKind::EnumMember => 22,
            SymbolKind::Lib => 2,
            SymbolKind::Fun => 12,
            SymbolKind::Method => 6,
            SymbolKind::Property | SymbolKind::Getter | SymbolKind::Setter => 7,
            SymbolKind::InstanceVariable => 8,
            SymbolKind::Variable => 13,
            SymbolKind::Constant => 14,
            SymbolKind::Alias => 5,
        }
    }

    /// True for symbols that introduce a namespace (`class`/`module`/
    /// `struct`/`enum`/`lib`) that subsequent declarations may nest under.
    pub const fn opens_namespace(self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Module
                | SymbolKind::Struct
                | SymbolKind::Enum
                | SymbolKind::Lib
        )
    }

    /// True for the accessor-macro kinds (`property`/`getter`/`setter`),
    /// which are always emitted with a leading `@` in their `name`.
    pub const fn is_accessor(self) -> bool {
        matches!(self, SymbolKind::Property | SymbolKind::Getter | SymbolKind::Setter)
    }
}

/// A single extracted symbol, per spec.md §3.
///
/// `name` is either a simple identifier (a local match) or a `::`-qualified
/// path; nested declarations are emitted twice, once under each form, per
/// the namespace-stack invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Simple or `::`-qualified name.
    pub name: String,
    /// Return type (methods), parent class (classes), or a literal tag
    /// (`"Module"`, `"Enum"`, ...) for containers.
    pub type_: String,
    /// Symbol classification.
    pub kind: SymbolKind,
    /// Absolute path of the file the symbol was extracted from.
    pub file: PathBuf,
    /// 0-based line the declaration starts on.
    pub line: u32,
    /// Rendered signature, for `fun`/`def` symbols.
    pub signature: Option<String>,
    /// The immediately-preceding contiguous run of `#`-prefixed comment
    /// lines (blanks between the comment and the code are not skipped over
    /// from the code's side, but blank comment lines within the run are).
    pub documentation: Option<String>,
}

impl SymbolInfo {
    /// Construct a `SymbolInfo` with no signature or documentation; the
    /// common case for variables, constants, and instance variables.
    pub fn new(
        name: impl Into<String>,
        type_: impl Into<String>,
        kind: SymbolKind,
        file: PathBuf,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            type_: type_.into(),
            kind,
            file,
            line,
            signature: None,
            documentation: None,
        }
    }

    /// Builder-style attach of a signature string.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Builder-style attach of documentation.
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// True if `name` contains a `::` namespace separator.
    pub fn is_qualified(&self) -> bool {
        self.name.contains("::")
    }

    /// The last path segment of a qualified name, or the name itself if
    /// unqualified.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsp_kind_mapping_is_stable() {
        assert_eq!(SymbolKind::Class.to_lsp_kind(), 5);
        assert_eq!(SymbolKind::Module.to_lsp_kind(), 2);
        assert_eq!(SymbolKind::Method.to_lsp_kind(), 6);
        assert_eq!(SymbolKind::Constant.to_lsp_kind(), 14);
    }

    #[test]
    fn namespace_opening_kinds() {
        assert!(SymbolKind::Class.opens_namespace());
        assert!(SymbolKind::Module.opens_namespace());
        assert!(!SymbolKind::Method.opens_namespace());
        assert!(!SymbolKind::Constant.opens_namespace());
    }

    #[test]
    fn qualified_name_detection() {
        let sym = SymbolInfo::new("Outer::Inner", "Module", SymbolKind::Module, "f.cr".into(), 0);
        assert!(sym.is_qualified());
        assert_eq!(sym.simple_name(), "Inner");

        let local = SymbolInfo::new("Inner", "Module", SymbolKind::Module, "f.cr".into(), 0);
        assert!(!local.is_qualified());
        assert_eq!(local.simple_name(), "Inner");
    }
}
