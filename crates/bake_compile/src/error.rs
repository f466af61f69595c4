//! Error types for compiler invocation.

use std::path::PathBuf;

/// Errors that keep a compiler process from running to completion.
///
/// The invoker reports these on the task's output and turns them into a
/// failed [`CompilationResult`](crate::CompilationResult) with exit code `-1`.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The directory for an object file could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler process could not be started.
    #[error("cannot run '{program}': {source}")]
    Spawn {
        /// The program that was being started.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading the compiler's diagnostic stream failed.
    #[error("cannot read compiler output: {source}")]
    Stream {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A compiler setting names no program.
    #[error("compiler setting '{setting}' is empty")]
    EmptyCommand {
        /// The setting that was empty (`cc` or `cxx`).
        setting: &'static str,
    },

    /// The worker thread pool could not be created.
    #[error("cannot start worker threads: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
