//! Content-Length message framing for the LSP Base Protocol.
//!
//! The LSP Base Protocol frames each JSON-RPC message as a small header
//! block (only `Content-Length` is meaningful; any other header is read and
//! discarded) followed by a blank line and exactly `Content-Length` bytes
//! of UTF-8 JSON body.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod framing;

pub use framing::{read_message, write_message, write_notification};
