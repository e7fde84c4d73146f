//! Recursive project/shard/stdlib symbol indexing, per spec.md §4.G.
//!
//! Scanning itself is delegated to [`liger_parser::extract_symbols`]; this
//! crate adds the directory-walking policy, the three-tier cache, the
//! rescan debounce, and the lookup operations the semantic analyzer needs.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod query;
mod scan;

pub use cache::{WorkspaceIndex, STDLIB_FALLBACKS};
