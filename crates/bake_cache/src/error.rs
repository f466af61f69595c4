//! Error types for dependency store operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing a dependency store.
///
/// Loading is fail-safe at the orchestrator level: a store that fails to
/// parse is reported and then treated as empty, which forces a full rebuild.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing the store file.
    #[error("dependency store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A line of the store could not be parsed.
    #[error("malformed dependency store at line {line}: {reason}")]
    Parse {
        /// The 1-based line number.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },

    /// A file or include name cannot be represented in the store format.
    #[error("cannot record '{name}' in the dependency store: names may not contain '@' or whitespace")]
    InvalidName {
        /// The offending name.
        name: String,
    },
}
