//! `bake --clean`: removal of build products.

use std::io;
use std::path::Path;

use bake_common::program_filename;
use bake_compile::OBJECT_DIR;
use bake_config::{load_config, BuildMode};

use crate::pipeline::{resolve_project_root, status};
use crate::{BuildArgs, GlobalArgs};

/// Runs `bake --clean` without a build.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    if args.debug || args.test {
        eprintln!("warning: --debug and --test only apply together with `build`");
    }
    let root = resolve_project_root(global)?;
    clean_project(&root, global.quiet)?;
    Ok(0)
}

/// Removes the programs and dependency stores of every build mode and the
/// object directory. Returns how many of them existed.
pub fn clean_project(root: &Path, quiet: bool) -> Result<usize, Box<dyn std::error::Error>> {
    let config = load_config(root)?;
    let mut removed = 0;

    for mode in BuildMode::ALL {
        let program = program_filename(
            &format!("{}{}", mode.output_prefix(), config.program),
            cfg!(windows),
        );
        removed += remove(&root.join(program))?;
        removed += remove(&root.join(mode.dependency_file()))?;
    }
    removed += remove(&root.join(OBJECT_DIR))?;

    status(quiet, "Cleaned", &format!("{removed} build product(s)"));
    Ok(removed)
}

/// Removes a file or directory tree. A missing path counts as zero.
fn remove(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    match result {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed");
            Ok(1)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(format!("cannot remove {}: {e}", path.display()).into()),
    }
}
