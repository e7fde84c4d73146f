//! Lookup operations over the indexed symbol caches, per spec.md §4.G.

use crate::cache::WorkspaceIndex;
use lazy_static::lazy_static;
use liger_symbol::{SymbolInfo, SymbolKind};
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref ENUM_MEMBER: Regex = Regex::new(r"^\s*([A-Z]\w*)\s*(?:=.*)?$").unwrap();
    static ref NESTED_TYPE: Regex =
        Regex::new(r"^\s*(?:class|module|struct)\s+([A-Za-z_]\w*)").unwrap();
    static ref NESTED_CONST: Regex = Regex::new(r"^\s*([A-Z][A-Z0-9_]*)\s*=").unwrap();
}

/// Per-type curated method lists offered as completions for a known
/// receiver type, merged with any index-derived owner methods.
fn curated_methods(receiver_type: &str) -> &'static [&'static str] {
    match receiver_type {
        "String" => &["size", "empty?", "upcase", "downcase", "chars", "split", "strip", "to_i", "to_f", "each_char"],
        "Array" => &["size", "empty?", "each", "map", "select", "reject", "first", "last", "push", "pop", "sort"],
        "Hash" => &["size", "empty?", "each", "keys", "values", "has_key?", "fetch", "merge"],
        "Int32" | "Int64" => &["to_s", "to_f", "times", "abs", "even?", "odd?", "upto", "downto"],
        "Float32" | "Float64" => &["to_s", "to_i", "abs", "round", "floor", "ceil"],
        "Bool" => &["to_s", "&", "|", "^"],
        "Range" => &["each", "to_a", "includes?", "min", "max"],
        "Regex" => &["match", "matches?", "source"],
        "Symbol" => &["to_s"],
        "Char" => &["to_s", "to_i", "ord", "upcase", "downcase"],
        "Time" => &["to_s", "year", "month", "day", "hour", "minute", "second"],
        "File" => &["read", "write", "exists?", "basename", "dirname"],
        "IO" => &["read", "write", "gets", "puts", "print"],
        _ => &[],
    }
}

impl WorkspaceIndex {
    /// All symbols (across all tiers) whose name exactly matches `name`.
    pub fn find_symbol_info(&self, name: &str) -> Vec<SymbolInfo> {
        self.scan_if_needed();
        let hits: Vec<SymbolInfo> =
            self.all_symbols().into_iter().filter(|s| s.name == name).collect();
        if !hits.is_empty() || self.stdlib_scanned() {
            return hits;
        }
        self.scan_stdlib_if_needed(None);
        self.all_symbols().into_iter().filter(|s| s.name == name).collect()
    }

    /// Property/getter/setter/instance-variable symbols matching `ivar`,
    /// which may be given with or without its leading `@`.
    pub fn find_property_definition(&self, ivar: &str) -> Vec<SymbolInfo> {
        let bare = ivar.strip_prefix('@').unwrap_or(ivar);
        let with_at = format!("@{bare}");
        self.scan_if_needed();
        self.all_symbols()
            .into_iter()
            .filter(|s| {
                matches!(
                    s.kind,
                    SymbolKind::Property
                        | SymbolKind::Getter
                        | SymbolKind::Setter
                        | SymbolKind::InstanceVariable
                )
            })
            .filter(|s| s.simple_name() == with_at || s.simple_name() == bare)
            .collect()
    }

    /// The method named `method` defined directly on `receiver_type`, found
    /// via the `ReceiverType::method` qualified name produced at scan time.
    pub fn find_method_definition(&self, receiver_type: &str, method: &str) -> Option<SymbolInfo> {
        self.scan_if_needed();
        let qualified = format!("{receiver_type}::{method}");
        self.all_symbols().into_iter().find(|s| {
            matches!(s.kind, SymbolKind::Method | SymbolKind::Fun) && s.name == qualified
        })
    }

    /// The type of a constant, variable, or instance variable named `name`
    /// declared in `file`, if any.
    pub fn type_at(&self, file: &Path, name: &str) -> Option<String> {
        self.symbols_in_file(file)
            .into_iter()
            .find(|s| s.simple_name() == name)
            .map(|s| s.type_)
    }

    /// Method names to offer for a receiver of `receiver_type`: the curated
    /// list for well-known types, merged with every indexed method whose
    /// owner's qualified prefix matches `receiver_type`.
    pub fn completions_for_receiver(&self, receiver_type: &str) -> Vec<String> {
        self.scan_if_needed();
        let mut out: Vec<String> = curated_methods(receiver_type).iter().map(|s| s.to_string()).collect();
        let prefix = format!("{receiver_type}::");
        for sym in self.all_symbols() {
            if matches!(sym.kind, SymbolKind::Method | SymbolKind::Fun) {
                if let Some(rest) = sym.name.strip_prefix(&prefix) {
                    if !rest.contains("::") {
                        out.push(rest.to_string());
                    }
                }
            }
        }
        out.sort();
        out.dedup();
        out
    }

    /// Immediate members of class `name` (qualified one level under it).
    pub fn class_members(&self, name: &str) -> Vec<SymbolInfo> {
        self.members_of(name)
    }

    /// Immediate members of struct `name` (qualified one level under it).
    pub fn struct_members(&self, name: &str) -> Vec<SymbolInfo> {
        self.members_of(name)
    }

    fn members_of(&self, name: &str) -> Vec<SymbolInfo> {
        self.scan_if_needed();
        let prefix = format!("{name}::");
        self.all_symbols()
            .into_iter()
            .filter(|s| s.name.strip_prefix(&prefix).is_some_and(|rest| !rest.contains("::")))
            .collect()
    }

    /// Enum member names for enum `name`, scanned from its declaring file
    /// between its declaration and the enclosing `end`.
    pub fn enum_values(&self, name: &str) -> Vec<String> {
        self.scan_if_needed();
        let Some(decl) = self
            .all_symbols()
            .into_iter()
            .find(|s| s.kind == SymbolKind::Enum && (s.name == name || s.simple_name() == name))
        else {
            return Vec::new();
        };
        let Ok(text) = std::fs::read_to_string(&decl.file) else { return Vec::new() };
        let lines: Vec<&str> = text.lines().collect();
        let decl_indent = indent_of(lines.get(decl.line as usize).copied().unwrap_or(""));

        let mut out = Vec::new();
        for line in lines.iter().skip(decl.line as usize + 1) {
            if line.trim().is_empty() {
                continue;
            }
            if indent_of(line) <= decl_indent && line.trim_start().starts_with("end") {
                break;
            }
            if let Some(c) = ENUM_MEMBER.captures(line) {
                out.push(c[1].to_string());
            }
        }
        out
    }

    /// Find the member named `name` declared under the symbol at
    /// `parent_line` in `file`: an enum member, a nested class/module/
    /// struct, or a constant, whichever the line-scan after `parent_line`
    /// hits first.
    pub fn find_member(&self, file: &Path, name: &str, parent_line: u32) -> Option<SymbolInfo> {
        let text = std::fs::read_to_string(file).ok()?;
        let lines: Vec<&str> = text.lines().collect();
        let parent_indent = indent_of(lines.get(parent_line as usize).copied().unwrap_or(""));

        for (offset, line) in lines.iter().enumerate().skip(parent_line as usize + 1) {
            if line.trim().is_empty() {
                continue;
            }
            let trimmed = line.trim_start();
            if indent_of(line) <= parent_indent
                && (trimmed.starts_with("end")
                    || trimmed.starts_with("class")
                    || trimmed.starts_with("module")
                    || trimmed.starts_with("struct")
                    || trimmed.starts_with("enum"))
            {
                break;
            }
            if let Some(c) = ENUM_MEMBER.captures(line) {
                if &c[1] == name {
                    return Some(SymbolInfo::new(name, "", SymbolKind::EnumMember, file.to_path_buf(), offset as u32));
                }
            }
            if let Some(c) = NESTED_TYPE.captures(line) {
                if &c[1] == name {
                    return Some(SymbolInfo::new(name, "", SymbolKind::Class, file.to_path_buf(), offset as u32));
                }
            }
            if let Some(c) = NESTED_CONST.captures(line) {
                if &c[1] == name {
                    return Some(SymbolInfo::new(name, "", SymbolKind::Constant, file.to_path_buf(), offset as u32));
                }
            }
        }
        None
    }
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::must;
    use std::fs;

    fn index_with(files: &[(&str, &str)]) -> (tempfile::TempDir, WorkspaceIndex) {
        let dir = must(tempfile::tempdir());
        for (name, content) in files {
            must(fs::write(dir.path().join(name), content));
        }
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        (dir, index)
    }

    #[test]
    fn find_symbol_info_matches_by_exact_name() {
        let (_dir, index) = index_with(&[("a.cr", "class Dog\nend\n")]);
        let hits = index.find_symbol_info("Dog");
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn find_method_definition_uses_qualified_name() {
        let (_dir, index) = index_with(&[("a.cr", "class Dog\n  def bark\n  end\nend\n")]);
        let hit = index.find_method_definition("Dog", "bark");
        assert!(hit.is_some());
    }

    #[test]
    fn find_property_definition_matches_with_or_without_sigil() {
        let (_dir, index) = index_with(&[("a.cr", "class Dog\n  @name : String\nend\n")]);
        assert_eq!(index.find_property_definition("@name").len(), 1);
        assert_eq!(index.find_property_definition("name").len(), 1);
    }

    #[test]
    fn completions_for_known_receiver_include_curated_and_indexed_methods() {
        let (_dir, index) = index_with(&[("a.cr", "class Array\n  def custom_thing\n  end\nend\n")]);
        let methods = index.completions_for_receiver("Array");
        assert!(methods.iter().any(|m| m == "each"));
        assert!(methods.iter().any(|m| m == "custom_thing"));
    }

    #[test]
    fn class_members_returns_immediate_children_only() {
        let (_dir, index) =
            index_with(&[("a.cr", "class Outer\n  class Inner\n    def deep\n    end\n  end\nend\n")]);
        let members = index.class_members("Outer");
        assert!(members.iter().any(|m| m.name == "Outer::Inner"));
        assert!(!members.iter().any(|m| m.name.contains("deep")));
    }

    #[test]
    fn enum_values_lists_bare_members() {
        let (_dir, index) = index_with(&[("a.cr", "enum Color\n  Red\n  Green\n  Blue\nend\n")]);
        let values = index.enum_values("Color");
        assert_eq!(values, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn find_member_locates_a_nested_class() {
        let (_dir, index) = index_with(&[("a.cr", "module M\n  class Inner\n  end\nend\n")]);
        let hit = index.find_member(index.root().join("a.cr").as_path(), "Inner", 0);
        assert!(hit.is_some());
    }
}
