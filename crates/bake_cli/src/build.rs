//! `bake build`: the incremental build, optionally followed by a test run.

use std::path::Path;
use std::process::Command;

use bake_build::{Build, BuildOptions};
use bake_compile::Console;
use bake_config::{load_config, resolve_profile, BuildMode, BuildProfile};

use crate::clean::clean_project;
use crate::pipeline::{resolve_project_root, status};
use crate::{BuildArgs, GlobalArgs};

/// Runs `bake build`.
///
/// Returns exit code 0 when the build (and the test run, if requested)
/// succeeded, 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let root = resolve_project_root(global)?;
    if args.clean {
        clean_project(&root, global.quiet)?;
    }

    let config = load_config(&root)?;
    let mode = if args.debug {
        BuildMode::Debug
    } else {
        BuildMode::Release
    };
    let profile = resolve_profile(&config, mode)?;

    let options = BuildOptions {
        color: global.color,
        quiet: global.quiet,
    };
    let report = Build::new(&root, &profile, options).run(&mut Console)?;
    if !report.success {
        return Ok(1);
    }

    if args.test {
        return run_program(&root, &profile, global.quiet);
    }
    Ok(0)
}

/// Runs the linked program from the project root and maps its exit status.
fn run_program(
    root: &Path,
    profile: &BuildProfile,
    quiet: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let program = root.join(&profile.program);
    status(quiet, "Running", &profile.program);

    let exit = Command::new(&program)
        .current_dir(root)
        .status()
        .map_err(|e| format!("cannot run {}: {e}", program.display()))?;

    match exit.code() {
        Some(0) => Ok(0),
        Some(code) => {
            eprintln!("error: {} exited with status {code}", profile.program);
            Ok(1)
        }
        None => {
            eprintln!("error: {} was terminated by a signal", profile.program);
            Ok(1)
        }
    }
}
