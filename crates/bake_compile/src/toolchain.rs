//! Compiler selection and output naming.

use bake_common::{LogicalFile, SourceKind};
use bake_config::BuildProfile;

use crate::error::CompileError;

/// Directory, relative to the project root, that receives object files.
pub const OBJECT_DIR: &str = "obj";

/// A compiler program plus any leading arguments (`ccache gcc`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerCommand {
    /// The program to execute.
    pub program: String,
    /// Arguments placed before the generated ones.
    pub args: Vec<String>,
}

impl CompilerCommand {
    /// Splits a compiler setting on whitespace. Returns `None` if it is blank.
    pub fn parse(setting: &str) -> Option<Self> {
        let mut words = setting.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// Returns the program followed by its leading arguments.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// The C and C++ compilers of a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiles `.c` files.
    pub cc: CompilerCommand,
    /// Compiles `.cpp` files.
    pub cxx: CompilerCommand,
}

impl Toolchain {
    /// Builds the toolchain from a resolved profile.
    pub fn from_profile(profile: &BuildProfile) -> Result<Self, CompileError> {
        Ok(Self {
            cc: CompilerCommand::parse(&profile.cc)
                .ok_or(CompileError::EmptyCommand { setting: "cc" })?,
            cxx: CompilerCommand::parse(&profile.cxx)
                .ok_or(CompileError::EmptyCommand { setting: "cxx" })?,
        })
    }

    /// The compiler for one translation unit.
    pub fn for_source(&self, file: &LogicalFile) -> &CompilerCommand {
        match file.kind() {
            Some(SourceKind::Cxx) => &self.cxx,
            _ => &self.cc,
        }
    }

    /// The compiler that drives the link: C++ if any source is C++.
    pub fn for_link<'a>(&self, sources: impl IntoIterator<Item = &'a LogicalFile>) -> &CompilerCommand {
        if sources
            .into_iter()
            .any(|file| file.kind() == Some(SourceKind::Cxx))
        {
            &self.cxx
        } else {
            &self.cc
        }
    }
}

/// Root-relative object file name for `file`: `obj/<prefix><stem>.o`.
pub fn object_name(prefix: &str, file: &LogicalFile) -> String {
    format!("{OBJECT_DIR}/{prefix}{}.o", file.stem_path())
}

/// Include search arguments for `file`: its own `include/` subdirectory,
/// then `include` itself.
pub fn include_args(file: &LogicalFile) -> Vec<String> {
    match file.parent() {
        Some(dir) => vec![format!("-Iinclude/{dir}"), "-Iinclude".to_string()],
        None => vec!["-Iinclude".to_string()],
    }
}
