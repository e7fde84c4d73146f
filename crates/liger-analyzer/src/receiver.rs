//! Receiver-type inference shared by goto-definition step 6, hover step 5,
//! and completion's `.`-prefix dispatch (spec.md §4.F).

use liger_parser::scanner::{classify, classify_variable, infer_type, LineMatch};
use liger_workspace_index::WorkspaceIndex;
use std::path::Path;

/// If the word touching `character` on `line` is the method half of a
/// `receiver.method` call, return `(receiver, method)`.
///
/// Built entirely on [`liger_position`]'s word primitives: the method name
/// is the word at the cursor, and placing the cursor one column earlier —
/// on the `.` itself — and asking for the word there recovers the receiver,
/// since [`liger_position::get_word_at_position`] already treats "cursor on
/// punctuation immediately after a word" as touching that word.
pub fn receiver_method_at(line: &str, character: u32) -> Option<(String, String)> {
    let (start, _end) = liger_position::word_utf16_range(line, character)?;
    if start == 0 {
        return None;
    }
    if char_at_utf16_col(line, start - 1) != Some('.') {
        return None;
    }
    let method = liger_position::get_word_at_position(line, character)?;
    let receiver = liger_position::get_word_at_position(line, start - 1)?;
    Some((receiver, method))
}

pub(crate) fn char_at_utf16_col(line: &str, col: u32) -> Option<char> {
    let mut utf16 = 0u32;
    for ch in line.chars() {
        if utf16 == col {
            return Some(ch);
        }
        utf16 += ch.len_utf16() as u32;
    }
    None
}

/// Like [`receiver_method_at`], but also matches a bare `.` immediately
/// before the cursor with nothing typed yet (`arr.`) as well as a partial
/// method prefix already underway (`arr.ea`). Returns `(receiver, partial)`,
/// where `partial` is empty in the bare-dot case. Used by completion, which
/// — unlike goto-definition and hover — must fire before a full word exists.
pub fn receiver_prefix_at(line: &str, character: u32) -> Option<(String, String)> {
    if let Some((start, _)) = liger_position::word_utf16_range(line, character) {
        if start > 0 && char_at_utf16_col(line, start - 1) == Some('.') {
            let partial = liger_position::get_word_at_position(line, character)?;
            let receiver = liger_position::get_word_at_position(line, start - 1)?;
            return Some((receiver, partial));
        }
    }
    if character > 0 && char_at_utf16_col(line, character - 1) == Some('.') {
        let receiver = liger_position::get_word_at_position(line, character - 1)?;
        return Some((receiver, String::new()));
    }
    None
}

/// Infer the Crystal type of `receiver` (a bare variable/constant name or an
/// `@ivar`), per spec.md §4.F step 6: "variable-assignment walk-back or
/// instance-variable declaration".
///
/// For an instance variable, consult the workspace index's type-at-file
/// lookup first, falling back to a cross-file property/getter/setter/ivar
/// search. For a bare name, walk `text` backward from `before_line` for the
/// nearest constant or local-variable assignment and infer its type from
/// the value expression.
pub fn infer_receiver_type(
    index: &WorkspaceIndex,
    file: &Path,
    text: &str,
    receiver: &str,
    before_line: u32,
) -> Option<String> {
    if receiver.starts_with('@') {
        if let Some(ty) = index.type_at(file, receiver) {
            return Some(ty);
        }
        return index.find_property_definition(receiver).into_iter().next().map(|s| s.type_);
    }

    let lines: Vec<&str> = text.lines().collect();
    let limit = (before_line as usize + 1).min(lines.len());
    for line in lines[..limit].iter().rev() {
        if let Some(LineMatch::Constant { name, expr, .. }) = classify(line) {
            if name == receiver {
                return Some(infer_type(&expr));
            }
        }
        if let Some((_, name, expr)) = classify_variable(line) {
            if name == receiver {
                return Some(infer_type(&expr));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::{must, must_some};
    use std::fs;

    #[test]
    fn recognizes_a_method_call_at_the_cursor() {
        let (receiver, method) = must_some(receiver_method_at("arr.each", 5));
        assert_eq!(receiver, "arr");
        assert_eq!(method, "each");
    }

    #[test]
    fn bare_word_is_not_a_method_call() {
        assert!(receiver_method_at("arr", 1).is_none());
    }

    #[test]
    fn receiver_prefix_matches_a_bare_trailing_dot() {
        let (receiver, partial) = must_some(receiver_prefix_at("arr.", 4));
        assert_eq!(receiver, "arr");
        assert_eq!(partial, "");
    }

    #[test]
    fn receiver_prefix_matches_a_partial_method_name() {
        let (receiver, partial) = must_some(receiver_prefix_at("arr.ea", 6));
        assert_eq!(receiver, "arr");
        assert_eq!(partial, "ea");
    }

    #[test]
    fn infers_a_local_variable_type_by_walking_backward() {
        let dir = must(tempfile::tempdir());
        let file = dir.path().join("a.cr");
        must(fs::write(&file, "x = [1, 2]\nx.size\n"));
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        let text = must(fs::read_to_string(&file));
        let ty = infer_receiver_type(&index, &file, &text, "x", 1);
        assert_eq!(ty.as_deref(), Some("Array"));
    }

    #[test]
    fn infers_an_instance_variable_type_via_the_index() {
        let dir = must(tempfile::tempdir());
        let file = dir.path().join("a.cr");
        must(fs::write(&file, "class A\n  @name : String\n  def show\n    @name.upcase\n  end\nend\n"));
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        let text = must(fs::read_to_string(&file));
        let ty = infer_receiver_type(&index, &file, &text, "@name", 3);
        assert_eq!(ty.as_deref(), Some("String"));
    }
}
