//! bake: incremental builds for C and C++ projects.
//!
//! `bake` (or `bake build`) compiles every translation unit under `src/`
//! whose sources or included headers changed since the last build, then
//! links the program. `--clean` removes build products, `--test` runs the
//! program after a successful build.

#![warn(missing_docs)]

mod build;
mod clean;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// bake, a small incremental C/C++ build tool.
#[derive(Parser, Debug)]
#[command(name = "bake", version, about = "Incremental C/C++ builds")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Project directory (or its `bakefile.json`).
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Build the debug configuration.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Remove programs, dependency stores and object files.
    #[arg(long, global = true)]
    pub clean: bool,

    /// Run the program after a successful build.
    #[arg(long, global = true)]
    pub test: bool,

    /// The subcommand to run. Defaults to `build`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Build the project incrementally.
    Build,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// What one invocation should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildArgs {
    /// Use the debug build mode.
    pub debug: bool,
    /// Clean before building, or only clean when no build was requested.
    pub clean: bool,
    /// Run the program after building.
    pub test: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress status lines.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Explicit project directory or configuration file.
    pub project: Option<PathBuf>,
}

impl Cli {
    /// `true` when the invocation only cleans.
    ///
    /// `--clean` without an explicit `build` cleans and stops.
    pub fn clean_only(&self) -> bool {
        self.clean && self.command.is_none()
    }

    /// The build-related flags.
    pub fn build_args(&self) -> BuildArgs {
        BuildArgs {
            debug: self.debug,
            clean: self.clean,
            test: self.test,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let args = cli.build_args();
    let clean_only = cli.clean_only();
    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        project: cli.project,
    };

    let result = if clean_only {
        clean::run(&args, &global)
    } else {
        build::run(&args, &global)
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber. `--verbose` forces debug level,
/// otherwise `RUST_LOG` applies with a default of `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Rough terminal detection from the `TERM` environment variable.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok_and(|term| term != "dumb")
}
