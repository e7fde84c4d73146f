//! Flat, namespace-qualified symbol extraction, shared by the parser's
//! per-file pass and `liger-workspace-index`'s multi-file scan.

use crate::scanner::{classify, infer_type, LineMatch};
use liger_symbol::{SymbolInfo, SymbolKind};
use std::path::{Path, PathBuf};

struct NamespaceFrame {
    name: String,
    indent: usize,
}

/// Extract every [`SymbolInfo`] from `text`, attributing them to `file`.
///
/// Only `class`/`module`/`lib` push the namespace stack, per spec.md §4.G;
/// `end` at an indentation at or below the top frame's pops it. Whenever the
/// stack is non-empty at a match, the symbol is emitted twice: once under
/// its simple name, once fully qualified.
pub fn extract_symbols(text: &str, file: &Path) -> Vec<SymbolInfo> {
    let mut stack: Vec<NamespaceFrame> = Vec::new();
    let mut out = Vec::new();
    let mut pending_doc: Vec<String> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if let Some(comment) = trimmed.strip_prefix('#') {
            let comment = comment.trim();
            if !comment.is_empty() {
                pending_doc.push(comment.to_string());
            }
            continue;
        }
        if trimmed.is_empty() {
            pending_doc.clear();
            continue;
        }

        let doc = if pending_doc.is_empty() { None } else { Some(pending_doc.join("\n")) };

        match classify(line) {
            Some(LineMatch::Class { indent, name }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, "Class", SymbolKind::Class, None, doc);
                stack.push(NamespaceFrame { name, indent });
            }
            Some(LineMatch::Module { indent, name }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, "Module", SymbolKind::Module, None, doc);
                stack.push(NamespaceFrame { name, indent });
            }
            Some(LineMatch::Lib { indent, name }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, "Lib", SymbolKind::Lib, None, doc);
                stack.push(NamespaceFrame { name, indent });
            }
            Some(LineMatch::Struct { name, .. }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, "Struct", SymbolKind::Struct, None, doc);
            }
            Some(LineMatch::Enum { name, .. }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, "Enum", SymbolKind::Enum, None, doc);
            }
            Some(LineMatch::Fun { name, params, ret, .. }) => {
                let ret_ty = ret.clone().unwrap_or_else(|| "Void".to_string());
                let sig = format!(
                    "fun {name}{}{}",
                    params.as_deref().unwrap_or("()"),
                    ret.map(|r| format!(": {r}")).unwrap_or_default()
                );
                emit(&mut out, &stack, file, line_no as u32, &name, &ret_ty, SymbolKind::Fun, Some(sig), doc);
            }
            Some(LineMatch::Method { name, params, ret, is_self, .. }) => {
                let ret_ty = ret.unwrap_or_else(|| "Void".to_string());
                let qualifier = if is_self { "self." } else { "" };
                let sig = format!("def {qualifier}{name}{}", params.as_deref().unwrap_or("()"));
                emit(&mut out, &stack, file, line_no as u32, &name, &ret_ty, SymbolKind::Method, Some(sig), doc);
            }
            Some(LineMatch::Accessor { kind, name, ty, .. }) => {
                let ivar_name = format!("@{name}");
                let ty = ty.unwrap_or_else(|| "Object".to_string());
                emit(&mut out, &stack, file, line_no as u32, &ivar_name, &ty, kind, None, doc);
            }
            Some(LineMatch::InstanceVariable { name, ty, .. }) => {
                let ivar_name = format!("@{name}");
                emit(&mut out, &stack, file, line_no as u32, &ivar_name, &ty, SymbolKind::InstanceVariable, None, doc);
            }
            Some(LineMatch::Constant { name, expr, .. }) => {
                let ty = infer_type(&expr);
                emit(&mut out, &stack, file, line_no as u32, &name, &ty, SymbolKind::Constant, None, doc);
            }
            Some(LineMatch::Alias { name, target, .. }) => {
                emit(&mut out, &stack, file, line_no as u32, &name, &target, SymbolKind::Alias, None, doc);
            }
            Some(LineMatch::End { indent }) => {
                while let Some(top) = stack.last() {
                    if indent <= top.indent {
                        stack.pop();
                    } else {
                        break;
                    }
                }
            }
            None => {}
        }
        pending_doc.clear();
    }

    out
}

#[allow(clippy::too_many_arguments)]
fn emit(
    out: &mut Vec<SymbolInfo>,
    stack: &[NamespaceFrame],
    file: &Path,
    line: u32,
    name: &str,
    type_: &str,
    kind: SymbolKind,
    signature: Option<String>,
    documentation: Option<String>,
) {
    let mut simple = SymbolInfo::new(name, type_, kind, PathBuf::from(file), line);
    if let Some(sig) = signature.clone() {
        simple = simple.with_signature(sig);
    }
    if let Some(doc) = documentation.clone() {
        simple = simple.with_documentation(doc);
    }

    if stack.is_empty() {
        out.push(simple);
        return;
    }

    let qualified_name =
        stack.iter().map(|f| f.name.as_str()).chain(std::iter::once(name)).collect::<Vec<_>>().join("::");
    let mut qualified = SymbolInfo::new(qualified_name, type_, kind, PathBuf::from(file), line);
    if let Some(sig) = signature {
        qualified = qualified.with_signature(sig);
    }
    if let Some(doc) = documentation {
        qualified = qualified.with_documentation(doc);
    }

    out.push(simple);
    out.push(qualified);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_declaration_is_emitted_simple_and_qualified() {
        let src = "module M\n  class C\n    def m\n    end\n  end\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        assert!(syms.iter().any(|s| s.name == "C"));
        assert!(syms.iter().any(|s| s.name == "M::C"));
        assert!(syms.iter().any(|s| s.name == "m"));
        assert!(syms.iter().any(|s| s.name == "M::C::m"));
    }

    #[test]
    fn top_level_symbol_is_emitted_once() {
        let src = "class Standalone\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        let matches: Vec<_> = syms.iter().filter(|s| s.name.contains("Standalone")).collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Standalone");
    }

    #[test]
    fn end_at_deeper_indentation_does_not_pop_namespace() {
        let src = "class A\n  def foo\n  end\n  @x : Int32\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        // @x is declared after `def foo ... end` but still inside `class A`,
        // so it must still be namespace-qualified.
        assert!(syms.iter().any(|s| s.name == "A::@x"));
    }

    #[test]
    fn instance_variable_and_constant_types() {
        let src = "class A\n  @count : Int32\n  MAX = 10\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        let ivar = syms.iter().find(|s| s.name == "@count").unwrap();
        assert_eq!(ivar.type_, "Int32");
        assert_eq!(ivar.kind, SymbolKind::InstanceVariable);

        let constant = syms.iter().find(|s| s.name == "MAX").unwrap();
        assert_eq!(constant.type_, "Int32");
        assert_eq!(constant.kind, SymbolKind::Constant);
    }

    #[test]
    fn doc_comment_run_is_attached_to_the_following_symbol() {
        let src = "# Builds a new dog.\n# Barks optionally.\nclass Dog\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        let dog = syms.iter().find(|s| s.name == "Dog").unwrap();
        assert_eq!(dog.documentation.as_deref(), Some("Builds a new dog.\nBarks optionally."));
    }

    #[test]
    fn blank_line_breaks_the_doc_comment_run() {
        let src = "# stale comment\n\nclass Dog\nend\n";
        let syms = extract_symbols(src, Path::new("f.cr"));
        let dog = syms.iter().find(|s| s.name == "Dog").unwrap();
        assert!(dog.documentation.is_none());
    }
}
