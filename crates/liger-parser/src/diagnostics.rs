//! Syntax diagnostics, per spec.md §4.E.
//!
//! There is no full Crystal grammar backing this: the "parser" is a block
//! balance check over `class`/`module`/`struct`/`enum`/`lib`/`def` and
//! `do`-block openers against `end`. Conditional modifiers (`if`/`unless`
//! as statement suffixes) are deliberately excluded from the opener set —
//! distinguishing those from block-form `if` by text alone is unreliable
//! enough to produce more false diagnostics than it catches.

use lazy_static::lazy_static;
use lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use regex::Regex;

lazy_static! {
    static ref OPENER: Regex =
        Regex::new(r"^\s*(?:private\s+|protected\s+)?(class|module|struct|enum|lib|def)\b").unwrap();
    static ref DO_BLOCK: Regex = Regex::new(r"\bdo(\s*\|[^|]*\|)?\s*$").unwrap();
    static ref END_LINE: Regex = Regex::new(r"^\s*end\s*$").unwrap();
}

struct Opener {
    keyword: String,
    line: u32,
    column: u32,
}

/// Run the balance check and return the diagnostics for `text`.
///
/// An empty or well-balanced document yields an empty list. On the first
/// imbalance found, exactly one diagnostic is produced.
pub fn check(text: &str) -> Vec<Diagnostic> {
    let mut stack: Vec<Opener> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx as u32 + 1;
        if END_LINE.is_match(line) {
            if stack.pop().is_none() {
                let column = (line.len() - line.trim_start().len()) as u32 + 1;
                return vec![diagnostic_at(line_no, column, "unexpected 'end'")];
            }
            continue;
        }
        if let Some(c) = OPENER.captures(line) {
            let column = (line.len() - line.trim_start().len()) as u32 + 1;
            stack.push(Opener { keyword: c[1].to_string(), line: line_no, column });
            continue;
        }
        if DO_BLOCK.is_match(line) {
            let column = (line.len() - line.trim_start().len()) as u32 + 1;
            stack.push(Opener { keyword: "do".to_string(), line: line_no, column });
        }
    }

    if let Some(unclosed) = stack.into_iter().next() {
        let message = format!("unterminated '{}', expected matching 'end'", unclosed.keyword);
        return vec![diagnostic_at(unclosed.line, unclosed.column, &message)];
    }

    Vec::new()
}

fn diagnostic_at(line_1_based: u32, column_1_based: u32, message: &str) -> Diagnostic {
    let line = line_1_based.saturating_sub(1);
    let character = column_1_based.saturating_sub(1);
    Diagnostic {
        range: Range {
            start: Position { line, character },
            end: Position { line, character: character + 1 },
        },
        severity: Some(DiagnosticSeverity::ERROR),
        code: None,
        code_description: None,
        source: Some("crystal".to_string()),
        message: message.to_string(),
        related_information: None,
        tags: None,
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_source_has_no_diagnostics() {
        let src = "class A\n  def foo\n  end\nend\n";
        assert!(check(src).is_empty());
    }

    #[test]
    fn empty_document_has_no_diagnostics() {
        assert!(check("").is_empty());
    }

    #[test]
    fn unterminated_class_is_reported_at_its_declaration() {
        let src = "class A\n  def foo\n  end\n";
        let diags = check(src);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].range.start.line, 0);
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diags[0].source.as_deref(), Some("crystal"));
        assert!(diags[0].message.contains("class"));
    }

    #[test]
    fn unexpected_end_is_reported_at_its_own_line() {
        let src = "def foo\nend\nend\n";
        let diags = check(src);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].range.start.line, 2);
        assert!(diags[0].message.contains("unexpected"));
    }

    #[test]
    fn do_block_requires_a_matching_end() {
        let src = "[1, 2].each do |x|\n  puts x\n";
        let diags = check(src);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("do"));
    }
}
