//! Resolution of a configuration and build mode into a build profile.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::flags::{evaluate_flags, FlagTable};
use crate::types::BuildConfig;

/// Default C compiler when neither `cc` nor the `CC` variable is set.
pub const DEFAULT_CC: &str = "gcc";

/// Default C++ compiler when neither `cxx` nor the `CXX` variable is set.
pub const DEFAULT_CXX: &str = "g++";

/// Which flavour of the program is being built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Optimized build with unprefixed outputs.
    #[default]
    Release,
    /// Debug build: sets the `DEBUG` flag and prefixes outputs with `dbg-`.
    Debug,
}

impl BuildMode {
    /// Every mode, in the order `clean` visits them.
    pub const ALL: [BuildMode; 2] = [BuildMode::Release, BuildMode::Debug];

    /// File name of this mode's dependency store.
    pub fn dependency_file(self) -> &'static str {
        match self {
            BuildMode::Release => ".bake-dependencies.txt",
            BuildMode::Debug => ".bake-dependencies-dbg.txt",
        }
    }

    /// Prefix applied to object files and the linked program.
    pub fn output_prefix(self) -> &'static str {
        match self {
            BuildMode::Release => "",
            BuildMode::Debug => "dbg-",
        }
    }
}

/// Everything one build invocation needs, resolved from the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildProfile {
    /// The build mode this profile was resolved for.
    pub mode: BuildMode,
    /// The flag table conditional elements were evaluated against.
    pub flags: FlagTable,
    /// Effective flags for `.c` files.
    pub c_flags: String,
    /// Effective flags for `.cpp` files.
    pub cxx_flags: String,
    /// Effective flags for the link step.
    pub linker_flags: String,
    /// Number of parallel compiler processes, at least 1.
    pub threads: usize,
    /// C compiler command line prefix.
    pub cc: String,
    /// C++ compiler command line prefix.
    pub cxx: String,
    /// File name of the linked program, prefix and platform suffix included.
    pub program: String,
    /// Where to write the statistics table, relative to the project root.
    pub stats_file: Option<PathBuf>,
}

impl BuildProfile {
    /// File name of the dependency store for this profile's mode.
    pub fn dependency_file(&self) -> &'static str {
        self.mode.dependency_file()
    }

    /// Output prefix for this profile's mode.
    pub fn output_prefix(&self) -> &'static str {
        self.mode.output_prefix()
    }
}

/// Resolves `config` for `mode` against the host platform flags.
pub fn resolve_profile(config: &BuildConfig, mode: BuildMode) -> Result<BuildProfile, ConfigError> {
    resolve_with_table(config, mode, FlagTable::host())
}

/// Resolves `config` for `mode` against an explicit base flag table.
///
/// `DEBUG` is added to `table` according to `mode`.
pub fn resolve_with_table(
    config: &BuildConfig,
    mode: BuildMode,
    mut table: FlagTable,
) -> Result<BuildProfile, ConfigError> {
    table.set("DEBUG", mode == BuildMode::Debug);

    let threads = config.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });

    let program = bake_common::program_filename(
        &format!("{}{}", mode.output_prefix(), config.program),
        table.is_set("WIN"),
    );

    let profile = BuildProfile {
        mode,
        c_flags: evaluate_flags(&config.c_flags, &table)?,
        cxx_flags: evaluate_flags(&config.cxx_flags, &table)?,
        linker_flags: evaluate_flags(&config.linker_flags, &table)?,
        flags: table,
        threads: threads.max(1),
        cc: compiler_command(config.cc.as_deref(), "CC", DEFAULT_CC),
        cxx: compiler_command(config.cxx.as_deref(), "CXX", DEFAULT_CXX),
        program,
        stats_file: config.build_stats_file.clone(),
    };
    tracing::debug!(
        mode = ?profile.mode,
        threads = profile.threads,
        cc = %profile.cc,
        cxx = %profile.cxx,
        "resolved build profile"
    );
    Ok(profile)
}

fn compiler_command(configured: Option<&str>, env_var: &str, default: &str) -> String {
    if let Some(command) = configured {
        return command.trim().to_string();
    }
    match std::env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}
