//! JSON-RPC message types, LSP method-name constants, error codes, and
//! advertised server capabilities for the `liger` Crystal language server.
//!
//! This crate isolates wire-level protocol types from the server runtime so
//! they can be depended on by the transport, analyzer, and dispatch layers
//! without pulling in the rest of the server.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod capabilities;
pub mod convert;
mod error_codes;
mod jsonrpc;
pub mod methods;

pub use error_codes::*;
pub use jsonrpc::*;

pub use lsp_types;
