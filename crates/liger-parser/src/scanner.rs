//! Line-based, regex-driven symbol scanning.
//!
//! Crystal has no ambient parser crate in the Rust ecosystem, and spec §9
//! recommends exactly this shape: "a small set of compiled patterns guarded
//! by a hand-written tokenizer for `class`/`module`/`end` indentation
//! tracking." This module is that tokenizer; [`crate::document_symbol`] and
//! `liger-workspace-index` both build on top of it.

use lazy_static::lazy_static;
use liger_symbol::SymbolKind;
use regex::Regex;

lazy_static! {
    static ref CLASS: Regex = Regex::new(r"^(\s*)class\s+([A-Za-z_]\w*)").unwrap();
    static ref MODULE: Regex = Regex::new(r"^(\s*)module\s+([A-Za-z_]\w*)").unwrap();
    static ref STRUCT: Regex = Regex::new(r"^(\s*)struct\s+([A-Za-z_]\w*)").unwrap();
    static ref ENUM: Regex = Regex::new(r"^(\s*)enum\s+([A-Za-z_]\w*)").unwrap();
    static ref LIB: Regex = Regex::new(r"^(\s*)lib\s+([A-Za-z_]\w*)").unwrap();
    static ref FUN: Regex =
        Regex::new(r"^(\s*)fun\s+(\w+)(?:\s*=\s*\w+)?\s*(\([^)]*\))?\s*(?::\s*(\S+))?").unwrap();
    static ref DEF: Regex = Regex::new(
        r"^(\s*)(?:private\s+)?def\s+(self\.)?(\w+[?!]?=?)\s*(\([^)]*\))?\s*(?::\s*(\S+))?"
    )
    .unwrap();
    static ref ACCESSOR: Regex =
        Regex::new(r"^(\s*)(property|getter|setter)[!?]?\s+(\w+)\s*(?::\s*(\S+))?").unwrap();
    static ref IVAR: Regex = Regex::new(r"^(\s*)@(\w+)\s*:\s*(\S+)").unwrap();
    static ref CONST: Regex = Regex::new(r"^(\s*)([A-Z][A-Z0-9_]*)\s*=\s*(.+?)\s*$").unwrap();
    static ref ALIAS: Regex = Regex::new(r"^(\s*)alias\s+(\w+)\s*=\s*(\S+)").unwrap();
    static ref END: Regex = Regex::new(r"^(\s*)end\s*$").unwrap();
    static ref VARIABLE: Regex = Regex::new(r"^(\s*)([a-z_]\w*)\s*=\s*(.+?)\s*$").unwrap();
}

fn indent_of(s: &str) -> usize {
    s.chars().count()
}

/// One classified source line.
#[derive(Debug, Clone)]
pub enum LineMatch {
    /// `class Name`
    Class { indent: usize, name: String },
    /// `module Name`
    Module { indent: usize, name: String },
    /// `struct Name`
    Struct { indent: usize, name: String },
    /// `enum Name`
    Enum { indent: usize, name: String },
    /// `lib Name`
    Lib { indent: usize, name: String },
    /// `fun name[=cname](params)[: T]`
    Fun { indent: usize, name: String, params: Option<String>, ret: Option<String> },
    /// `def [self.]name(params)[: T]`
    Method {
        indent: usize,
        name: String,
        is_self: bool,
        params: Option<String>,
        ret: Option<String>,
    },
    /// `property|getter|setter name[: T]`
    Accessor { indent: usize, kind: SymbolKind, name: String, ty: Option<String> },
    /// `@name : T`
    InstanceVariable { indent: usize, name: String, ty: String },
    /// `CONST = expr`
    Constant { indent: usize, name: String, expr: String },
    /// `alias Name = T`
    Alias { indent: usize, name: String, target: String },
    /// `end`
    End { indent: usize },
}

/// Classify a single source line per the precedence order in spec.md §4.G's
/// table (top to bottom, first match wins — see the recorded design
/// decision for the overlap between constants and generic assignment).
pub fn classify(line: &str) -> Option<LineMatch> {
    if let Some(c) = CLASS.captures(line) {
        return Some(LineMatch::Class { indent: indent_of(&c[1]), name: c[2].to_string() });
    }
    if let Some(c) = MODULE.captures(line) {
        return Some(LineMatch::Module { indent: indent_of(&c[1]), name: c[2].to_string() });
    }
    if let Some(c) = STRUCT.captures(line) {
        return Some(LineMatch::Struct { indent: indent_of(&c[1]), name: c[2].to_string() });
    }
    if let Some(c) = ENUM.captures(line) {
        return Some(LineMatch::Enum { indent: indent_of(&c[1]), name: c[2].to_string() });
    }
    if let Some(c) = LIB.captures(line) {
        return Some(LineMatch::Lib { indent: indent_of(&c[1]), name: c[2].to_string() });
    }
    if let Some(c) = FUN.captures(line) {
        return Some(LineMatch::Fun {
            indent: indent_of(&c[1]),
            name: c[2].to_string(),
            params: c.get(3).map(|m| m.as_str().to_string()),
            ret: c.get(4).map(|m| m.as_str().to_string()),
        });
    }
    if let Some(c) = DEF.captures(line) {
        return Some(LineMatch::Method {
            indent: indent_of(&c[1]),
            is_self: c.get(2).is_some(),
            name: c[3].to_string(),
            params: c.get(4).map(|m| m.as_str().to_string()),
            ret: c.get(5).map(|m| m.as_str().to_string()),
        });
    }
    if let Some(c) = ACCESSOR.captures(line) {
        let kind = match &c[2] {
            "property" => SymbolKind::Property,
            "getter" => SymbolKind::Getter,
            _ => SymbolKind::Setter,
        };
        return Some(LineMatch::Accessor {
            indent: indent_of(&c[1]),
            kind,
            name: c[3].to_string(),
            ty: c.get(4).map(|m| m.as_str().to_string()),
        });
    }
    if let Some(c) = IVAR.captures(line) {
        return Some(LineMatch::InstanceVariable {
            indent: indent_of(&c[1]),
            name: c[2].to_string(),
            ty: c[3].to_string(),
        });
    }
    if let Some(c) = CONST.captures(line) {
        return Some(LineMatch::Constant {
            indent: indent_of(&c[1]),
            name: c[2].to_string(),
            expr: c[3].to_string(),
        });
    }
    if let Some(c) = ALIAS.captures(line) {
        return Some(LineMatch::Alias {
            indent: indent_of(&c[1]),
            name: c[2].to_string(),
            target: c[3].to_string(),
        });
    }
    if let Some(c) = END.captures(line) {
        return Some(LineMatch::End { indent: indent_of(&c[1]) });
    }
    None
}

/// Classify a plain lower-case assignment (`x = expr`), used only for the
/// parser's top-level "variable" document symbols — this form is not part
/// of the workspace index's table and is checked separately so it never
/// shadows the constant/alias/accessor patterns above.
pub fn classify_variable(line: &str) -> Option<(usize, String, String)> {
    if CLASS.is_match(line)
        || MODULE.is_match(line)
        || STRUCT.is_match(line)
        || ENUM.is_match(line)
        || LIB.is_match(line)
        || FUN.is_match(line)
        || DEF.is_match(line)
        || ACCESSOR.is_match(line)
        || IVAR.is_match(line)
        || CONST.is_match(line)
        || ALIAS.is_match(line)
        || END.is_match(line)
    {
        return None;
    }
    let c = VARIABLE.captures(line)?;
    Some((indent_of(&c[1]), c[2].to_string(), c[3].to_string()))
}

/// Infer a Crystal type tag from a value expression, per spec.md §4.G.
pub fn infer_type(expr: &str) -> String {
    let expr = expr.trim();
    if expr.starts_with('"') {
        return "String".to_string();
    }
    if expr.starts_with('\'') && expr.ends_with('\'') && expr.len() >= 3 {
        return "Char".to_string();
    }
    if expr == "true" || expr == "false" {
        return "Bool".to_string();
    }
    if expr == "nil" {
        return "Nil".to_string();
    }
    if expr.starts_with('[') {
        return "Array".to_string();
    }
    if expr.starts_with('{') {
        return "Hash".to_string();
    }
    if expr.starts_with('/') {
        return "Regex".to_string();
    }
    if expr.starts_with(':') && expr.len() > 1 && expr.as_bytes()[1].is_ascii_alphabetic() {
        return "Symbol".to_string();
    }
    if expr.contains("..") {
        return "Range".to_string();
    }
    if let Some(rest) = expr.strip_suffix(".new").or_else(|| expr.split(".new").next()) {
        if !rest.is_empty() && rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return rest.to_string();
        }
    }
    if let Some(owner) = expr.strip_suffix(".from_json").or_else(|| {
        expr.find(".from_json").map(|i| &expr[..i])
    }) {
        if !owner.is_empty() && owner.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            return owner.to_string();
        }
    }
    for (suffix, ty) in [
        (".to_s", "String"),
        (".to_i", "Int32"),
        (".to_f", "Float64"),
        (".size", "Int32"),
        (".empty?", "Bool"),
        (".split", "Array(String)"),
        (".chars", "Array(Char)"),
    ] {
        if expr.contains(suffix) {
            return ty.to_string();
        }
    }
    if expr.parse::<i64>().is_ok() {
        return "Int32".to_string();
    }
    if expr.parse::<f64>().is_ok() && expr.contains('.') {
        return "Float64".to_string();
    }
    if expr.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && expr.chars().all(|c| c.is_alphanumeric() || c == '_')
    {
        return expr.to_string();
    }
    "Object".to_string()
}
