//! Project root resolution shared by the CLI commands.

use std::path::{Path, PathBuf};

use bake_config::CONFIG_FILE;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `bakefile.json`.
///
/// Returns the directory containing `bakefile.json`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory (use --project)",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--project` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `bakefile.json`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = match &global.project {
        Some(path) if path.is_file() => path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        Some(path) => {
            if !path.is_dir() {
                return Err(format!("project directory {} does not exist", path.display()).into());
            }
            path.clone()
        }
        None => find_project_root(&std::env::current_dir()?)?,
    };
    tracing::debug!(root = %root.display(), "project root");
    Ok(root)
}

/// Prints a right-aligned status line unless `quiet`.
pub fn status(quiet: bool, verb: &str, detail: &str) {
    if !quiet {
        eprintln!("{verb:>12} {detail}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(project: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            color: false,
            project,
        }
    }

    #[test]
    fn find_project_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bakefile.json"), "{}").unwrap();
        assert_eq!(find_project_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bakefile.json"), "{}").unwrap();
        let sub = tmp.path().join("src").join("net");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_ignores_directory_named_like_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bakefile.json"), "{}").unwrap();
        let sub = tmp.path().join("nested");
        fs::create_dir_all(sub.join("bakefile.json")).unwrap();
        assert_eq!(find_project_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_project_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = find_project_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find bakefile.json"));
    }

    #[test]
    fn resolve_project_root_from_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("bakefile.json");
        fs::write(&config, "{}").unwrap();
        assert_eq!(resolve_project_root(&global(Some(config))).unwrap(), tmp.path());
    }

    #[test]
    fn resolve_project_root_from_dir_without_config() {
        let tmp = TempDir::new().unwrap();
        let root = resolve_project_root(&global(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn resolve_project_root_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = resolve_project_root(&global(Some(missing))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
