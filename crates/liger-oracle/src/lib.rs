//! Subprocess bridge to the Crystal compiler's `tool implementations` and
//! `tool context` commands, per spec.md §4.H.
//!
//! The oracle never invents semantics: it only shells out to the real
//! `crystal` binary (or, in tests, a [`subprocess::Subprocess`] double) and
//! parses its output. Every call degrades to "no answer" on subprocess
//! failure, non-zero exit, or unparsable output rather than propagating.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod oracle;
pub mod subprocess;

pub use oracle::{CompilerOracle, ImplementationLocation, OracleError, SharedOracle};
pub use subprocess::{CommandOutput, OsSubprocess, Subprocess, SubprocessError};
