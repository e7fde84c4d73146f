//! `textDocument/hover`, per spec.md §4.F's seven-step fallback order.
//!
//! Steps 6 and 7 in spec.md's own list read oddly in sequence — a
//! universal-match "bold word" fallback listed *before* the "optional
//! compiler oracle" step that can only ever fire when nothing else has.
//! Decision (recorded in DESIGN.md): the oracle's `context` call is tried
//! before falling all the way back to the bold-word text, since otherwise
//! it could never contribute anything.

use crate::receiver::{infer_receiver_type, receiver_method_at};
use crate::{require_path, Analyzer};
use lazy_static::lazy_static;
use liger_oracle::Subprocess;
use liger_parser::scanner::{classify, LineMatch};
use liger_position::{get_word_at_position, Position};
use liger_symbol::{SymbolInfo, SymbolKind};
use liger_uri::uri_to_path;
use liger_workspace_index::STDLIB_FALLBACKS;
use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};
use regex::Regex;
use std::path::PathBuf;

lazy_static! {
    static ref FUN_CNAME: Regex =
        Regex::new(r"^\s*fun\s+(\w+)\s*=\s*(\w+)").unwrap_or_else(|_| unreachable!());
}

pub(crate) fn hover<S: Subprocess>(analyzer: &Analyzer<S>, uri: &str, pos: Position) -> Option<Hover> {
    let doc = analyzer.documents.get(uri)?;
    let line = doc.text.lines().nth(pos.line as usize)?;
    let file = uri_to_path(uri)?;

    // Step 1: require-hover.
    if let Some(req) = require_path::parse(line) {
        if req.contains(pos.character) {
            let roots = stdlib_roots(analyzer);
            let (resolved, kind) = require_path::resolve(&req.path, &file, analyzer.root, &roots);
            return Some(markdown(require_path::render_hover(&req.path, &resolved, kind)));
        }
    }

    // Step 2: fun-hover, distinguishing the Crystal name from the C name.
    if let Some(caps) = FUN_CNAME.captures(line) {
        let crystal_name = &caps[1];
        let cname = &caps[2];
        if get_word_at_position(line, pos.character).as_deref() == Some(crystal_name) {
            return Some(markdown(format!(
                "**fun** `{crystal_name}`\n\nExtern binding to C symbol `{cname}`."
            )));
        }
    }

    let word = get_word_at_position(line, pos.character)?;
    let bare = word.strip_prefix('@').unwrap_or(&word);

    // Step 3: current-file signature lookup, with an attached doc comment.
    if let Some(rendered) = current_file_signature(&doc.text, &word, bare) {
        return Some(markdown(rendered));
    }

    // Step 4: workspace index lookup.
    if let Some(sym) = analyzer.index.find_symbol_info(&word).into_iter().next() {
        return Some(markdown(render_symbol(analyzer, &sym)));
    }

    // Step 5: workspace-inferred type annotation.
    if let Some(ty) = infer_receiver_type(analyzer.index, &file, &doc.text, &word, pos.line) {
        return Some(markdown(format!("`{word} : {ty}`")));
    }
    if let Some((receiver, method)) = receiver_method_at(line, pos.character) {
        if method == word {
            if let Some(ty) = infer_receiver_type(analyzer.index, &file, &doc.text, &receiver, pos.line) {
                return Some(markdown(format!("`{receiver} : {ty}`")));
            }
        }
    }

    // Step 7 (tried ahead of the universal step-6 fallback; see module docs):
    // optional compiler oracle context.
    let main = analyzer.oracle.main_file(analyzer.root);
    if analyzer.oracle.sync_before_call(&file, &doc.text).is_ok() {
        if let Some(context) = analyzer.oracle.context(&file, pos.line + 1, pos.character + 1, main.as_deref()) {
            return Some(markdown(format!("```\n{}\n```", context.trim_end())));
        }
    }

    // Step 6: last-resort fallback.
    Some(markdown(format!("**{word}**\n\nType information not available.")))
}

fn current_file_signature(text: &str, word: &str, bare: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let matched = match classify(line) {
            Some(LineMatch::Method { name, ref params, ref ret, is_self, .. }) if name == word => {
                let qualifier = if is_self { "self." } else { "" };
                Some(format!(
                    "def {qualifier}{name}{}{}",
                    params.as_deref().unwrap_or("()"),
                    ret.as_ref().map(|r| format!(": {r}")).unwrap_or_default()
                ))
            }
            Some(LineMatch::Class { name, .. }) if name == word => Some(format!("class {name}")),
            Some(LineMatch::Module { name, .. }) if name == word => Some(format!("module {name}")),
            Some(LineMatch::Struct { name, .. }) if name == word => Some(format!("struct {name}")),
            Some(LineMatch::Enum { name, .. }) if name == word => Some(format!("enum {name}")),
            Some(LineMatch::Accessor { kind, name, ref ty, .. }) if name == bare => {
                let keyword = match kind {
                    SymbolKind::Getter => "getter",
                    SymbolKind::Setter => "setter",
                    _ => "property",
                };
                Some(format!("{keyword} {name}{}", ty.as_ref().map(|t| format!(": {t}")).unwrap_or_default()))
            }
            Some(LineMatch::Constant { name, ref expr, .. }) if name == word => {
                Some(format!("{name} = {expr}"))
            }
            Some(LineMatch::Alias { name, ref target, .. }) if name == word => {
                Some(format!("alias {name} = {target}"))
            }
            _ => None,
        };
        let Some(signature) = matched else { continue };
        let doc = preceding_doc_comment(&lines, i);
        let mut rendered = format!("```crystal\n{signature}\n```");
        if let Some(doc) = doc {
            rendered.push_str("\n\n");
            rendered.push_str(&doc);
        }
        return Some(rendered);
    }
    None
}

fn preceding_doc_comment(lines: &[&str], decl_line: usize) -> Option<String> {
    let mut collected = Vec::new();
    let mut i = decl_line;
    while i > 0 {
        i -= 1;
        let trimmed = lines[i].trim_start();
        let Some(comment) = trimmed.strip_prefix('#') else { break };
        collected.push(comment.trim().to_string());
    }
    if collected.is_empty() {
        return None;
    }
    collected.reverse();
    Some(collected.join("\n"))
}

fn render_symbol<S: Subprocess>(analyzer: &Analyzer<S>, sym: &SymbolInfo) -> String {
    let snippet = match sym.kind {
        SymbolKind::Class => format!("class {}", sym.simple_name()),
        SymbolKind::Module => format!("module {}", sym.simple_name()),
        SymbolKind::Struct => format!("struct {}", sym.simple_name()),
        SymbolKind::Enum => format!("enum {}", sym.simple_name()),
        SymbolKind::Method | SymbolKind::Fun => sym.signature.clone().unwrap_or_else(|| sym.simple_name().to_string()),
        SymbolKind::Property | SymbolKind::Getter | SymbolKind::Setter => {
            format!("{} : {}", sym.simple_name(), sym.type_)
        }
        SymbolKind::InstanceVariable => format!("{} : {}", sym.simple_name(), sym.type_),
        SymbolKind::Constant => format!("{} = {}", sym.simple_name(), sym.type_),
        _ => sym.simple_name().to_string(),
    };
    let mut rendered = format!("```crystal\n{snippet}\n```");
    if let Some(doc) = &sym.documentation {
        rendered.push_str("\n\n");
        rendered.push_str(doc);
    }

    match sym.kind {
        SymbolKind::Class => {
            let members = analyzer.index.class_members(sym.simple_name());
            if !members.is_empty() {
                rendered.push_str("\n\n**Members:**\n");
                for m in &members {
                    rendered.push_str(&format!("- {}\n", m.simple_name()));
                }
            }
        }
        SymbolKind::Struct => {
            let members = analyzer.index.struct_members(sym.simple_name());
            if !members.is_empty() {
                rendered.push_str("\n\n**Members:**\n");
                for m in &members {
                    rendered.push_str(&format!("- {}\n", m.simple_name()));
                }
            }
        }
        SymbolKind::Enum => {
            let values = analyzer.index.enum_values(sym.simple_name());
            if !values.is_empty() {
                rendered.push_str("\n\n**Values:** ");
                rendered.push_str(&values.join(", "));
            }
        }
        _ => {}
    }
    rendered
}

fn stdlib_roots<S: Subprocess>(analyzer: &Analyzer<S>) -> Vec<PathBuf> {
    let mut roots = analyzer.oracle.crystal_path_roots();
    if roots.is_empty() {
        roots.extend(STDLIB_FALLBACKS.iter().map(PathBuf::from).filter(|p| p.is_dir()));
    }
    roots
}

fn markdown(value: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value }),
        range: None,
    }
}
