//! Enumeration of the top-level translation units under `src/`.

use std::io;
use std::path::Path;

use bake_common::LogicalFile;

use crate::resolver::SOURCE_DIR;

/// Returns every `.c` and `.cpp` file under `<root>/src`, sorted by name.
///
/// A project without a `src/` directory has no sources.
pub fn collect_sources(root: &Path) -> io::Result<Vec<LogicalFile>> {
    let src = root.join(SOURCE_DIR);
    let mut sources = Vec::new();
    if src.is_dir() {
        walk(&src, &src, &mut sources)?;
    }
    sources.sort();
    tracing::debug!(count = sources.len(), "collected sources");
    Ok(sources)
}

fn walk(base: &Path, dir: &Path, out: &mut Vec<LogicalFile>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(base, &path, out)?;
            continue;
        }
        let Ok(relative) = path.strip_prefix(base) else {
            continue;
        };
        match LogicalFile::from_relative_path(relative) {
            Some(file) if file.kind().is_some() => out.push(file),
            Some(_) => {}
            None => tracing::warn!(path = %path.display(), "skipping source with a non UTF-8 name"),
        }
    }
    Ok(())
}
