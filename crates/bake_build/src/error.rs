//! Error types for the build orchestrator.

use std::path::PathBuf;

use bake_cache::CacheError;
use bake_compile::CompileError;

/// Failures outside of compilation itself.
///
/// Compiler and linker failures are not errors: they are reported through
/// [`BuildReport::success`](crate::BuildReport::success).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The `src/` tree could not be listed.
    #[error("cannot list sources under {path}: {source}")]
    Sources {
        /// The directory being listed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The dependency store could not be written.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The compiler or the worker pool could not be set up.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The statistics table could not be written.
    #[error("cannot write build statistics to {path}: {source}")]
    Stats {
        /// The statistics file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
