//! Subprocess execution abstraction, so the compiler oracle can be tested
//! without actually forking `crystal`.
//!
//! Directly grounded on the teacher's `SubprocessRuntime`/
//! `OsSubprocessRuntime`/`MockSubprocessRuntime` trio.

use std::fmt;

/// Captured output of one subprocess invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Process exit code; `-1` if the process was killed by a signal.
    pub status_code: i32,
}

impl CommandOutput {
    /// True iff the process exited with status code 0.
    pub fn success(&self) -> bool {
        self.status_code == 0
    }
}

/// A subprocess failed to start or could not be waited on.
#[derive(Debug, Clone)]
pub struct SubprocessError {
    message: String,
}

impl SubprocessError {
    /// Construct an error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for SubprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SubprocessError {}

/// Runs an external command and captures its output.
pub trait Subprocess: Send + Sync {
    /// Execute `program` with `args`, returning its captured output.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, SubprocessError>;
}

/// The default subprocess runtime, backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSubprocess;

impl Subprocess for OsSubprocess {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, SubprocessError> {
        use std::process::Command;

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| SubprocessError::new(format!("failed to run {program}: {e}")))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// A test double recording every invocation and replaying queued responses.
pub mod mock {
    use super::{CommandOutput, Subprocess, SubprocessError};
    use parking_lot::Mutex;

    /// One recorded `run` call.
    #[derive(Debug, Clone)]
    pub struct Invocation {
        /// The program that was invoked.
        pub program: String,
        /// The arguments it was invoked with.
        pub args: Vec<String>,
    }

    /// Records invocations and returns queued [`CommandOutput`]s in order,
    /// falling back to a default once the queue is exhausted.
    #[derive(Default)]
    pub struct MockSubprocess {
        invocations: Mutex<Vec<Invocation>>,
        responses: Mutex<Vec<Result<CommandOutput, SubprocessError>>>,
    }

    impl MockSubprocess {
        /// A mock with no queued responses (every call returns empty success).
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the next response to return.
        pub fn push_response(&self, response: Result<CommandOutput, SubprocessError>) {
            self.responses.lock().push(response);
        }

        /// Queue a successful response with the given stdout.
        pub fn push_success(&self, stdout: impl Into<String>) {
            self.push_response(Ok(CommandOutput {
                stdout: stdout.into(),
                stderr: String::new(),
                status_code: 0,
            }));
        }

        /// All invocations recorded so far, in call order.
        pub fn invocations(&self) -> Vec<Invocation> {
            self.invocations.lock().clone()
        }
    }

    impl Subprocess for MockSubprocess {
        fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, SubprocessError> {
            self.invocations.lock().push(Invocation {
                program: program.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            });
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Ok(CommandOutput { stdout: String::new(), stderr: String::new(), status_code: 0 })
            } else {
                responses.remove(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockSubprocess;
    use super::*;
    use liger_tdd_support::must;

    #[test]
    fn mock_records_program_and_args() {
        let mock = MockSubprocess::new();
        let _ = mock.run("crystal", &["tool", "context"]);
        let calls = mock.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "crystal");
        assert_eq!(calls[0].args, vec!["tool", "context"]);
    }

    #[test]
    fn mock_replays_queued_responses_in_order() {
        let mock = MockSubprocess::new();
        mock.push_success("first");
        mock.push_success("second");
        assert_eq!(must(mock.run("x", &[])).stdout, "first");
        assert_eq!(must(mock.run("x", &[])).stdout, "second");
    }

    #[test]
    fn mock_default_response_is_empty_success() {
        let mock = MockSubprocess::new();
        let out = must(mock.run("x", &[]));
        assert!(out.success());
        assert!(out.stdout.is_empty());
    }
}
