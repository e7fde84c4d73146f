//! The server's owned, single-threaded mutable state: the document store,
//! the workspace index, the compiler oracle, and the lifecycle state
//! machine, per spec.md §4.B and §5.
//!
//! No locking anywhere here: dispatch reads one message, handles it to
//! completion, and writes the response before the next read, so every
//! field is borrowed at most once at a time. `WorkspaceIndex` and
//! `CompilerOracle` carry internal `RwLock`s only because their own crates'
//! public API shape requires it (shared references rather than `&mut
//! self` on every query) — not because this server contends on them.

use crate::state::ServerState;
use liger_document::DocumentStore;
use liger_oracle::{CompilerOracle, OsSubprocess, Subprocess};
use liger_workspace_index::WorkspaceIndex;
use lsp_types::Diagnostic;
use std::path::{Path, PathBuf};

/// Every piece of process-wide mutable state the dispatch loop acts on.
///
/// Generic over the subprocess implementation so integration tests can run
/// the whole dispatch loop with a [`liger_oracle::subprocess::mock::MockSubprocess`]
/// instead of actually forking `crystal`.
pub struct LspServer<S: Subprocess = OsSubprocess> {
    state: ServerState,
    shutdown_received: bool,
    documents: DocumentStore,
    root: PathBuf,
    index: WorkspaceIndex,
    oracle: CompilerOracle<S>,
    /// `--strict` CLI flag; advisory per spec.md §6, not consulted by any
    /// operation's semantics.
    pub strict: bool,
}

impl LspServer<OsSubprocess> {
    /// A server rooted at `root`, backed by the real `crystal` subprocess.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_subprocess(root, OsSubprocess)
    }
}

impl<S: Subprocess> LspServer<S> {
    /// A server rooted at `root`, backed by a caller-supplied subprocess
    /// implementation.
    pub fn with_subprocess(root: impl Into<PathBuf>, subprocess: S) -> Self {
        let root = root.into();
        Self {
            state: ServerState::Created,
            shutdown_received: false,
            documents: DocumentStore::new(),
            index: WorkspaceIndex::new(root.clone()),
            oracle: CompilerOracle::new(subprocess),
            root,
            strict: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        self.state
    }

    /// The workspace root this server serves.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Re-root the server at `root` (used when `initialize` carries a
    /// `rootUri`/`workspaceFolders` different from the process's working
    /// directory at startup) and create the reserved `.liger-cache`
    /// directory under it, per spec.md §6.
    ///
    /// The workspace index is rebuilt fresh at the new root; no scan has
    /// run yet, so rebuilding loses nothing.
    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        self.index = WorkspaceIndex::new(self.root.clone());
        if let Err(e) = std::fs::create_dir_all(self.root.join(".liger-cache")) {
            eprintln!("[liger] failed to create .liger-cache under {}: {e}", self.root.display());
        }
    }

    /// Transition `Created → Initialized`. A no-op, logged, if called
    /// again or out of order — the dispatch core is what enforces ordering
    /// against incoming requests; this setter just records the fact.
    pub fn mark_initialized(&mut self) {
        self.state = ServerState::Initialized;
    }

    /// Transition to `ShuttingDown`, per the `shutdown` request.
    pub fn mark_shutting_down(&mut self) {
        self.state = ServerState::ShuttingDown;
        self.shutdown_received = true;
    }

    /// Transition to `Exited`, per the `exit` notification.
    pub fn mark_exited(&mut self) {
        self.state = ServerState::Exited;
    }

    /// The process exit code for an `exit` notification: 0 if `shutdown`
    /// was received first, 1 otherwise, per spec.md §4.B and §6.
    pub fn exit_code(&self) -> i32 {
        if self.shutdown_received {
            0
        } else {
            1
        }
    }

    /// The open-document store.
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Mutable access to the open-document store, for the text-sync
    /// notification handlers.
    pub fn documents_mut(&mut self) -> &mut DocumentStore {
        &mut self.documents
    }

    /// The workspace symbol index.
    pub fn index(&self) -> &WorkspaceIndex {
        &self.index
    }

    /// The compiler oracle.
    pub fn oracle(&self) -> &CompilerOracle<S> {
        &self.oracle
    }

    /// Build an [`liger_analyzer::Analyzer`] borrowing this server's live
    /// state. Cheap: the analyzer holds only references.
    pub fn analyzer(&self) -> liger_analyzer::Analyzer<'_, S> {
        liger_analyzer::Analyzer::new(&self.documents, &self.index, &self.oracle, &self.root)
    }

    /// Re-derive syntax diagnostics for `uri`'s current text and refresh
    /// its workspace-index cache entry, for the text-sync handlers to call
    /// before publishing `textDocument/publishDiagnostics`.
    pub fn diagnostics_for(&mut self, uri: &str) -> Vec<Diagnostic> {
        let Some(doc) = self.documents.get(uri) else { return Vec::new() };
        let text = doc.text.clone();
        if let Some(path) = liger_uri::uri_to_path(uri) {
            self.index.update_source(&path, &text);
        }
        liger_parser::parse(&text).diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_oracle::subprocess::mock::MockSubprocess;
    use liger_tdd_support::must;

    #[test]
    fn new_server_starts_created_and_not_shut_down() {
        let dir = must(tempfile::tempdir());
        let server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        assert_eq!(server.state(), ServerState::Created);
        assert_eq!(server.exit_code(), 1);
    }

    #[test]
    fn exit_code_is_zero_only_after_shutdown() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        server.mark_shutting_down();
        assert_eq!(server.exit_code(), 0);
    }

    #[test]
    fn set_root_creates_the_liger_cache_directory() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        server.set_root(dir.path());
        assert!(dir.path().join(".liger-cache").is_dir());
    }

    #[test]
    fn diagnostics_for_unknown_uri_is_empty() {
        let dir = must(tempfile::tempdir());
        let mut server = LspServer::with_subprocess(dir.path(), MockSubprocess::new());
        assert!(server.diagnostics_for("file:///missing.cr").is_empty());
    }
}
