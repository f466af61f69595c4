//! Logical-to-physical path resolution over the `src/` and `include/` trees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bake_common::LogicalFile;

/// Directory holding translation units and private headers.
pub const SOURCE_DIR: &str = "src";

/// Directory holding public headers.
pub const INCLUDE_DIR: &str = "include";

/// Where a logical file lives on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectivePath {
    /// Exactly one tree holds the file (or both hold the same file).
    Resolved(PathBuf),
    /// Neither tree holds the file.
    NotFound,
    /// Both trees hold distinct files with this name.
    Ambiguous,
}

impl EffectivePath {
    /// Returns the physical path if the file resolved.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EffectivePath::Resolved(path) => Some(path),
            EffectivePath::NotFound | EffectivePath::Ambiguous => None,
        }
    }

    /// The compiler-style message for a failed resolution.
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            EffectivePath::Resolved(_) => None,
            EffectivePath::NotFound => Some("No such file or directory"),
            EffectivePath::Ambiguous => Some("Ambiguous file include"),
        }
    }
}

/// Typed form of a failed resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Neither tree holds the file.
    #[error("{file}: No such file or directory")]
    NotFound {
        /// The logical name that was looked up.
        file: LogicalFile,
    },
    /// Both trees hold distinct files with this name.
    #[error("{file}: Ambiguous file include")]
    Ambiguous {
        /// The logical name that was looked up.
        file: LogicalFile,
    },
}

/// Resolves logical names against one project root, memoizing every answer
/// for the lifetime of the resolver (one build invocation).
#[derive(Debug)]
pub struct PathResolver {
    root: PathBuf,
    cache: HashMap<LogicalFile, EffectivePath>,
}

impl PathResolver {
    /// Creates a resolver for the project at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Returns the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `file`, consulting the filesystem at most once per name.
    pub fn resolve(&mut self, file: &LogicalFile) -> EffectivePath {
        if let Some(hit) = self.cache.get(file) {
            return hit.clone();
        }
        let resolved = self.lookup(file);
        tracing::debug!(file = %file, resolved = ?resolved, "resolved logical file");
        self.cache.insert(file.clone(), resolved.clone());
        resolved
    }

    /// Resolves `file`, turning a failed resolution into an error.
    pub fn resolve_existing(&mut self, file: &LogicalFile) -> Result<PathBuf, ResolveError> {
        match self.resolve(file) {
            EffectivePath::Resolved(path) => Ok(path),
            EffectivePath::NotFound => Err(ResolveError::NotFound { file: file.clone() }),
            EffectivePath::Ambiguous => Err(ResolveError::Ambiguous { file: file.clone() }),
        }
    }

    /// Shortens a physical path under the root for display (`src/main.c`).
    pub fn display_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn lookup(&self, file: &LogicalFile) -> EffectivePath {
        let src = file.to_path(&self.root.join(SOURCE_DIR));
        let inc = file.to_path(&self.root.join(INCLUDE_DIR));

        match (src.is_file(), inc.is_file()) {
            (true, true) if same_file(&src, &inc) => EffectivePath::Resolved(src),
            (true, true) => EffectivePath::Ambiguous,
            (true, false) => EffectivePath::Resolved(src),
            (false, true) => EffectivePath::Resolved(inc),
            (false, false) => EffectivePath::NotFound,
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
