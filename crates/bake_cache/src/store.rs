//! Plain-text encoding of the dependency store.
//!
//! One line per known file, sorted by name:
//!
//! ```text
//! main.c 1718000000.25 util.h@1 net/socket.h@4
//! util.h 1717999000.5
//! ```
//!
//! The line number of an include is the text after the last `@` of its token.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use bake_common::{LogicalFile, ModTime};

use crate::error::CacheError;
use crate::record::{DependencyRecord, DependencyState, IncludeEdge};

/// The dependency store file of one build mode.
#[derive(Clone, Debug)]
pub struct DependencyStore {
    path: PathBuf,
}

impl DependencyStore {
    /// Creates a handle for the store at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the store's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the store. A missing file is an empty state.
    pub fn load(&self) -> Result<DependencyState, CacheError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no dependency store yet");
                return Ok(DependencyState::new());
            }
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let state = Self::parse(&text)?;
        tracing::debug!(path = %self.path.display(), files = state.len(), "loaded dependency store");
        Ok(state)
    }

    /// Parses the store format.
    pub fn parse(text: &str) -> Result<DependencyState, CacheError> {
        let mut state = DependencyState::new();
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut tokens = line.split_whitespace();
            let Some(name) = tokens.next() else {
                continue;
            };
            let parse_err = |reason: String| CacheError::Parse {
                line: line_no,
                reason,
            };

            let file = LogicalFile::new(name)
                .ok_or_else(|| parse_err(format!("invalid file name '{name}'")))?;
            let mtime: ModTime = tokens
                .next()
                .ok_or_else(|| parse_err(format!("missing modification time for '{name}'")))?
                .parse()
                .map_err(|e| parse_err(format!("{e}")))?;

            let includes = tokens
                .map(|token| parse_include(token).map_err(&parse_err))
                .collect::<Result<Vec<_>, _>>()?;

            state.insert(file, DependencyRecord::new(mtime, includes));
        }
        Ok(state)
    }

    /// Renders `state` in the store format.
    pub fn render(state: &DependencyState) -> Result<String, CacheError> {
        let mut out = String::new();
        for (file, record) in state {
            check_name(file)?;
            // Writing to a String cannot fail.
            let _ = write!(out, "{file} {}", record.mtime);
            for edge in &record.includes {
                check_name(&edge.target)?;
                let _ = write!(out, " {}@{}", edge.target, edge.line);
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Writes `state` to the store file, replacing its contents.
    pub fn save(&self, state: &DependencyState) -> Result<(), CacheError> {
        let text = Self::render(state)?;
        std::fs::write(&self.path, text).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), files = state.len(), "wrote dependency store");
        Ok(())
    }

    /// Writes `new` only if it differs from `loaded`.
    ///
    /// Returns `true` if the file was written.
    pub fn save_if_changed(
        &self,
        loaded: &DependencyState,
        new: &DependencyState,
    ) -> Result<bool, CacheError> {
        if loaded == new {
            tracing::debug!(path = %self.path.display(), "dependency store unchanged");
            return Ok(false);
        }
        self.save(new)?;
        Ok(true)
    }
}

fn parse_include(token: &str) -> Result<IncludeEdge, String> {
    let (name, line) = token
        .rsplit_once('@')
        .ok_or_else(|| format!("include '{token}' has no '@<line>' suffix"))?;
    let line: u32 = line
        .parse()
        .map_err(|_| format!("include '{token}' has an invalid line number"))?;
    let target = LogicalFile::new(name).ok_or_else(|| format!("invalid include name '{name}'"))?;
    Ok(IncludeEdge::new(target, line))
}

fn check_name(file: &LogicalFile) -> Result<(), CacheError> {
    if file.is_encodable() {
        Ok(())
    } else {
        Err(CacheError::InvalidName {
            name: file.to_string(),
        })
    }
}
