//! Server lifecycle state machine, per spec.md §4.B.

/// `Created → Initialized → ShuttingDown → Exited`, gating which requests
/// the dispatch core is willing to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// The process has started but has not yet handled `initialize`.
    Created,
    /// `initialize` has been handled; the server answers normal requests.
    Initialized,
    /// `shutdown` has been received; `exit` is expected next.
    ShuttingDown,
    /// `exit` has been received; the dispatch loop is about to terminate.
    Exited,
}

impl ServerState {
    /// True once `initialize` has completed, per spec.md's rule that only
    /// `initialize`/`exit` may be handled beforehand.
    pub fn is_initialized(self) -> bool {
        !matches!(self, ServerState::Created)
    }
}
