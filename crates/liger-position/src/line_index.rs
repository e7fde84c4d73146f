//! Offset↔Position conversion backed by a cache of line-start byte offsets.

use crate::range::Position;

/// Maps between byte offsets and `(line, UTF-16 character)` positions for a
/// piece of source text.
///
/// Rebuilt whenever the owning document's text changes; cheap to construct
/// (`O(n)` over the text) since `liger` applies edits synchronously and
/// never needs incremental re-indexing mid-edit.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a line index from source text, splitting on `\n`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Number of lines, counting a trailing unterminated line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of the start of `line`, if `line` is in range.
    pub fn line_start_offset(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// Convert a byte offset into a `(line, UTF-16 character)` position.
    ///
    /// Offsets past the end of the text clamp to the last valid position.
    pub fn offset_to_position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(l) => l.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let character =
            text[line_start..offset].chars().map(char::len_utf16).sum::<usize>() as u32;
        Position::new(line as u32, character)
    }

    /// Convert a `(line, UTF-16 character)` position into a byte offset.
    ///
    /// A position past the end of the document clamps to `text.len()`; a
    /// character past the end of its line clamps to the line's end.
    pub fn position_to_offset(&self, text: &str, pos: Position) -> usize {
        let line = pos.line as usize;
        if line >= self.line_starts.len() {
            return text.len();
        }
        let line_start = self.line_starts[line];
        let line_end = self.line_starts.get(line + 1).map_or(text.len(), |&next| {
            let mut end = next;
            let bytes = text.as_bytes();
            while end > line_start && (bytes[end - 1] == b'\n' || bytes[end - 1] == b'\r') {
                end -= 1;
            }
            end
        });
        let line_text = &text[line_start..line_end];

        let mut utf16_units = 0u32;
        let mut byte_offset = 0usize;
        for ch in line_text.chars() {
            if utf16_units >= pos.character {
                break;
            }
            utf16_units += char::len_utf16(ch) as u32;
            byte_offset += ch.len_utf8();
        }
        line_start + byte_offset
    }
}
