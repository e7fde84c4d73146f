//! Conversions between `liger`'s internal position/range types and the wire
//! DTOs from `lsp-types`.
//!
//! `liger-position::Range` is inclusive on both ends (see that crate's
//! docs); the LSP wire format is half-open. The boundary lives here so no
//! other crate needs to reason about the difference.

use liger_position::{Position, Range};

/// Convert an internal [`Position`] to its wire representation.
pub fn lsp_position(pos: Position) -> lsp_types::Position {
    lsp_types::Position { line: pos.line, character: pos.character }
}

/// Convert a wire [`lsp_types::Position`] to the internal representation.
pub fn from_lsp_position(pos: lsp_types::Position) -> Position {
    Position::new(pos.line, pos.character)
}

/// Convert an inclusive-end internal [`Range`] to a half-open wire range by
/// extending the end column by one UTF-16 unit.
pub fn lsp_range(range: Range) -> lsp_types::Range {
    lsp_types::Range {
        start: lsp_position(range.start),
        end: lsp_types::Position {
            line: range.end.line,
            character: range.end.character + 1,
        },
    }
}

/// Build a wire `Location` for `uri` at the zero-width position `pos`.
pub fn location_at(uri: lsp_types::Url, pos: Position) -> lsp_types::Location {
    let p = lsp_position(pos);
    lsp_types::Location { uri, range: lsp_types::Range { start: p, end: p } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_range_becomes_half_open_on_the_wire() {
        let internal = Range::new(Position::new(0, 2), Position::new(0, 7));
        let wire = lsp_range(internal);
        assert_eq!(wire.start.character, 2);
        assert_eq!(wire.end.character, 8);
    }

    #[test]
    fn position_round_trips_through_lsp_conversion() {
        let p = Position::new(3, 9);
        assert_eq!(from_lsp_position(lsp_position(p)), p);
    }
}
