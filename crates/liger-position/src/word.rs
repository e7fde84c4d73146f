//! Crystal-lexical word extraction at a cursor position.

/// True iff `c` is a Crystal identifier word character: alphanumeric,
/// `_`, `?`, or `!`.
///
/// Analyzer call sites additionally admit a leading `@` to capture
/// instance variables; that is handled by [`get_word_at_position`]
/// itself, not by this predicate, since `@` is only valid at the start
/// of a token.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '?' || c == '!'
}

/// Expand outward from `character` (a 0-based UTF-16 column on `line`) over
/// a run of word characters and return the token found, or `None` if the
/// cursor sits on non-word text (whitespace, punctuation, end of line).
///
/// If the expanded token is immediately preceded by `@`, the sigil is
/// included so instance variables (`@name`) resolve as a single token.
/// Trailing `?`/`!` are retained since they are part of the identifier in
/// Crystal (`empty?`, `save!`).
pub fn get_word_at_position(line: &str, character: u32) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();

    // `character` is a UTF-16 column; map it to a char index. Since Crystal
    // identifiers are ASCII, BMP characters (len_utf16 == 1) dominate, so we
    // walk chars accumulating UTF-16 width until we reach or pass the column.
    let mut utf16_col = 0u32;
    let mut char_idx = chars.len();
    for (i, ch) in chars.iter().enumerate() {
        if utf16_col >= character {
            char_idx = i;
            break;
        }
        utf16_col += ch.len_utf16() as u32;
    }

    if char_idx >= chars.len() {
        // Cursor may sit exactly at end-of-line, which can still be the
        // tail of a word (e.g. cursor just past the last char of `foo`).
        if char_idx == 0 {
            return None;
        }
        if is_word_char(chars[char_idx - 1]) {
            char_idx -= 1;
        } else {
            return None;
        }
    } else if !is_word_char(chars[char_idx]) {
        // Cursor sits on non-word text; check if it's immediately after a
        // word run (cursor between the last word char and the next char).
        if char_idx > 0 && is_word_char(chars[char_idx - 1]) {
            char_idx -= 1;
        } else {
            return None;
        }
    }

    let mut start = char_idx;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = char_idx;
    while end + 1 < chars.len() && is_word_char(chars[end + 1]) {
        end += 1;
    }

    if start > 0 && chars[start - 1] == '@' {
        start -= 1;
    }

    let word: String = chars[start..=end].iter().collect();
    if word.is_empty() || word == "@" { None } else { Some(word) }
}

/// The half-open UTF-16 column span `[start, end)` of the word touching
/// `character` on `line`, or `None` if the cursor sits on non-word text.
///
/// Shares [`get_word_at_position`]'s expansion rule (leading `@` included,
/// trailing `?`/`!` retained) but returns the span rather than the text, for
/// callers that need to build a wire [`Range`] (e.g. `prepareRename`).
///
/// [`Range`]: crate::Range
pub fn word_utf16_range(line: &str, character: u32) -> Option<(u32, u32)> {
    let chars: Vec<char> = line.chars().collect();

    let mut utf16_col = 0u32;
    let mut char_idx = chars.len();
    for (i, ch) in chars.iter().enumerate() {
        if utf16_col >= character {
            char_idx = i;
            break;
        }
        utf16_col += ch.len_utf16() as u32;
    }

    if char_idx >= chars.len() {
        if char_idx == 0 || !is_word_char(chars[char_idx - 1]) {
            return None;
        }
        char_idx -= 1;
    } else if !is_word_char(chars[char_idx]) {
        if char_idx > 0 && is_word_char(chars[char_idx - 1]) {
            char_idx -= 1;
        } else {
            return None;
        }
    }

    let mut start = char_idx;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = char_idx;
    while end + 1 < chars.len() && is_word_char(chars[end + 1]) {
        end += 1;
    }
    if start > 0 && chars[start - 1] == '@' {
        start -= 1;
    }

    let utf16 = |n: usize| chars[..n].iter().map(|c| c.len_utf16() as u32).sum::<u32>();
    Some((utf16(start), utf16(end + 1)))
}

/// Every word token on `line`, in order, as `(text, utf16_start, utf16_end)`
/// with a half-open span. Used by rename and find-references to locate
/// whole-word occurrences across a document.
///
/// A token immediately preceded by `@` includes the sigil, matching
/// [`get_word_at_position`]'s instance-variable handling.
pub fn iter_words(line: &str) -> Vec<(String, u32, u32)> {
    let chars: Vec<char> = line.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !is_word_char(chars[i]) {
            i += 1;
            continue;
        }
        let mut start = i;
        let mut end = i;
        while end + 1 < chars.len() && is_word_char(chars[end + 1]) {
            end += 1;
        }
        if start > 0 && chars[start - 1] == '@' {
            start -= 1;
        }
        let utf16 = |n: usize| chars[..n].iter().map(|c| c.len_utf16() as u32).sum::<u32>();
        let text: String = chars[start..=end].iter().collect();
        out.push((text, utf16(start), utf16(end + 1)));
        i = end + 1;
    }
    out
}
