//! The outcome of one compiler or linker process.

use std::path::PathBuf;
use std::time::Duration;

/// Exit code recorded when the process could not be run to a normal exit.
pub const ABNORMAL_EXIT: i32 = -1;

/// What one compiler invocation produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilationResult {
    /// The object file or program the invocation was meant to write.
    pub output: PathBuf,
    /// The process exit code, or `-1` if it never ran or was killed.
    pub exit_code: i32,
    /// Wall time from spawn to exit.
    pub elapsed: Duration,
    /// Number of warnings in the diagnostic stream.
    pub warnings: usize,
    /// Number of errors (including fatal errors) in the diagnostic stream.
    pub errors: usize,
}

impl CompilationResult {
    /// A result for an invocation that did not reach a normal exit.
    pub fn abnormal(output: PathBuf, elapsed: Duration) -> Self {
        Self {
            output,
            exit_code: ABNORMAL_EXIT,
            elapsed,
            warnings: 0,
            errors: 0,
        }
    }

    /// Returns `true` if the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
