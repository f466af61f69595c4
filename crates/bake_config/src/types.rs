//! Configuration types deserialized from `bakefile.json`.

use serde::Deserialize;
use std::path::PathBuf;

/// Default output program name when `program` is absent.
pub const DEFAULT_PROGRAM: &str = "a.out";

/// The project build configuration parsed from `bakefile.json`.
///
/// Every key is optional; absent keys take the documented defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Base name of the linked program.
    #[serde(default = "default_program")]
    pub program: String,
    /// Flags passed when compiling `.c` files.
    #[serde(default)]
    pub c_flags: FlagList,
    /// Flags passed when compiling `.cpp` files.
    #[serde(default)]
    pub cxx_flags: FlagList,
    /// Flags passed when linking.
    #[serde(default)]
    pub linker_flags: FlagList,
    /// Number of parallel compiler processes (defaults to host parallelism).
    #[serde(default)]
    pub threads: Option<usize>,
    /// Where to write the duration-sorted compilation statistics table.
    #[serde(default)]
    pub build_stats_file: Option<PathBuf>,
    /// C compiler command, optionally with leading arguments (`"ccache gcc"`).
    #[serde(default)]
    pub cc: Option<String>,
    /// C++ compiler command, optionally with leading arguments.
    #[serde(default)]
    pub cxx: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            c_flags: FlagList::default(),
            cxx_flags: FlagList::default(),
            linker_flags: FlagList::default(),
            threads: None,
            build_stats_file: None,
            cc: None,
            cxx: None,
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

/// A compiler flag setting: either a literal argument string or a list of
/// elements, some of which may be conditional (`"@!WIN&64: -m64"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagList {
    /// Used verbatim.
    Plain(String),
    /// Evaluated element by element against the flag table.
    Elements(Vec<String>),
}

impl Default for FlagList {
    fn default() -> Self {
        FlagList::Plain(String::new())
    }
}
