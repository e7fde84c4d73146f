//! Position and range types, line indexing, and Crystal-lexical word
//! extraction used throughout `liger`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod line_index;
mod range;
mod word;

pub use line_index::LineIndex;
pub use range::{Position, Range};
pub use word::{get_word_at_position, is_word_char, iter_words, word_utf16_range};
