//! Project-relative file names shared by every stage of the build.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A project-relative file name as written in source (e.g. `"net/socket.h"`).
///
/// Logical names are always `/`-separated and normalized: `.` segments are
/// dropped and `..` pops the previous segment. The same logical file may live
/// under either `src/` or `include/`; which one is decided by the path
/// resolver, never by the name itself.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalFile(String);

/// The language of a translation unit, decided by its file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// A C translation unit (`.c`).
    C,
    /// A C++ translation unit (`.cpp`).
    Cxx,
}

impl SourceKind {
    /// Maps a file extension (without the dot) to a translation-unit kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "c" => Some(SourceKind::C),
            "cpp" => Some(SourceKind::Cxx),
            _ => None,
        }
    }
}

impl LogicalFile {
    /// Normalizes `raw` into a logical file name.
    ///
    /// Both `/` and `\` are accepted as separators. Returns `None` if the name
    /// is empty after normalization or a `..` segment would climb above the
    /// project root.
    pub fn new(raw: &str) -> Option<Self> {
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                s => segments.push(s),
            }
        }
        if segments.is_empty() {
            return None;
        }
        Some(Self(segments.join("/")))
    }

    /// Builds a logical name from a path relative to one of the source roots.
    ///
    /// Returns `None` for absolute paths or non-UTF-8 components.
    pub fn from_relative_path(path: &Path) -> Option<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Self::new(&segments.join("/"))
    }

    /// Resolves an include written relative to this file's directory.
    ///
    /// `"./util.h"` included from `"net/socket.c"` becomes `"net/util.h"`.
    pub fn join_relative(&self, raw: &str) -> Option<Self> {
        match self.parent() {
            Some(dir) => Self::new(&format!("{dir}/{raw}")),
            None => Self::new(raw),
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the directory part of the name, or `None` for top-level files.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|pos| &self.0[..pos])
    }

    /// Returns the extension of the final segment, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.file_name();
        match file_name.rfind('.') {
            Some(0) | None => None,
            Some(pos) => Some(&file_name[pos + 1..]),
        }
    }

    /// Returns the name with the extension of the final segment removed.
    pub fn stem_path(&self) -> &str {
        match self.extension() {
            Some(ext) => &self.0[..self.0.len() - ext.len() - 1],
            None => &self.0,
        }
    }

    /// Returns the final segment of the name.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the translation-unit kind if this is a `.c` or `.cpp` file.
    pub fn kind(&self) -> Option<SourceKind> {
        self.extension().and_then(SourceKind::from_extension)
    }

    /// Returns `true` if the name can be written to the dependency store.
    ///
    /// The store separates tokens by whitespace and include line numbers by
    /// the last `@`, so neither may appear in a name.
    pub fn is_encodable(&self) -> bool {
        !self.0.contains('@') && !self.0.chars().any(char::is_whitespace)
    }

    /// Joins the name onto `root`, one path component per segment.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.0.split('/'));
        path
    }
}

impl Borrow<str> for LogicalFile {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for LogicalFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicalFile({:?})", self.0)
    }
}
