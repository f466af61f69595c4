//! Running the compiler and linker as child processes.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use bake_common::LogicalFile;
use bake_config::BuildProfile;
use bake_diagnostics::{DiagnosticParser, TerminalRenderer};

use crate::error::CompileError;
use crate::output::OutputSink;
use crate::result::{CompilationResult, ABNORMAL_EXIT};
use crate::toolchain::{include_args, object_name, Toolchain};

/// Builds and runs compile and link commands for one project.
#[derive(Clone, Debug)]
pub struct Invoker {
    root: PathBuf,
    toolchain: Toolchain,
    prefix: String,
    c_flags: Vec<String>,
    cxx_flags: Vec<String>,
    linker_flags: Vec<String>,
    program: String,
    color: bool,
}

impl Invoker {
    /// Creates an invoker for the project at `root` using `profile`.
    pub fn new(root: &Path, profile: &BuildProfile, color: bool) -> Result<Self, CompileError> {
        Ok(Self {
            root: root.to_path_buf(),
            toolchain: Toolchain::from_profile(profile)?,
            prefix: profile.output_prefix().to_string(),
            c_flags: split_flags(&profile.c_flags),
            cxx_flags: split_flags(&profile.cxx_flags),
            linker_flags: split_flags(&profile.linker_flags),
            program: profile.program.clone(),
            color,
        })
    }

    /// Absolute path of the object file for `file`.
    pub fn object_path(&self, file: &LogicalFile) -> PathBuf {
        self.root_relative(&object_name(&self.prefix, file))
    }

    /// Absolute path of the linked program.
    pub fn program_path(&self) -> PathBuf {
        self.root.join(&self.program)
    }

    /// The full compile command line for `file`, program first.
    ///
    /// `<cc> -c -o obj/<prefix><stem>.o [-Iinclude/<dir>] -Iinclude src/<file> <flags>`
    pub fn compile_command(&self, file: &LogicalFile) -> Vec<String> {
        let compiler = self.toolchain.for_source(file);
        let flags = match file.kind() {
            Some(bake_common::SourceKind::Cxx) => &self.cxx_flags,
            _ => &self.c_flags,
        };
        let mut argv = compiler.argv();
        argv.extend([
            "-c".to_string(),
            "-o".to_string(),
            object_name(&self.prefix, file),
        ]);
        argv.extend(include_args(file));
        argv.push(format!("src/{file}"));
        argv.extend(flags.iter().cloned());
        argv
    }

    /// The full link command line over every source's object file.
    ///
    /// `<cc|cxx> -o <program> <objects> <flags>`
    pub fn link_command(&self, sources: &[LogicalFile]) -> Vec<String> {
        let mut argv = self.toolchain.for_link(sources).argv();
        argv.push("-o".to_string());
        argv.push(self.program.clone());
        argv.extend(sources.iter().map(|file| object_name(&self.prefix, file)));
        argv.extend(self.linker_flags.iter().cloned());
        argv
    }

    /// Compiles one translation unit into its object file.
    pub fn compile_one(&self, file: &LogicalFile, out: &mut dyn OutputSink) -> CompilationResult {
        let output = self.object_path(file);
        let start = Instant::now();
        if let Some(dir) = output.parent() {
            if let Err(source) = std::fs::create_dir_all(dir) {
                let err = CompileError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                };
                return self.report_failure(err, output, start.elapsed(), out);
            }
        }
        self.execute(&self.compile_command(file), output, out)
    }

    /// Links the object files of `sources` into the program.
    pub fn link(&self, sources: &[LogicalFile], out: &mut dyn OutputSink) -> CompilationResult {
        self.execute(&self.link_command(sources), self.program_path(), out)
    }

    fn execute(&self, argv: &[String], output: PathBuf, out: &mut dyn OutputSink) -> CompilationResult {
        out.line(&argv.join(" "));
        tracing::debug!(command = %argv.join(" "), "running compiler");

        let start = Instant::now();
        match self.run_streaming(argv, out) {
            Ok((exit_code, errors, warnings)) => CompilationResult {
                output,
                exit_code,
                elapsed: start.elapsed(),
                warnings,
                errors,
            },
            Err(err) => self.report_failure(err, output, start.elapsed(), out),
        }
    }

    /// Runs the process, feeding its stderr through the diagnostic parser.
    ///
    /// Returns the exit code and the error and warning counts.
    fn run_streaming(
        &self,
        argv: &[String],
        out: &mut dyn OutputSink,
    ) -> Result<(i32, usize, usize), CompileError> {
        let (program, args) = argv.split_first().ok_or(CompileError::EmptyCommand {
            setting: "cc",
        })?;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CompileError::Spawn {
                program: program.clone(),
                source,
            })?;

        let renderer = TerminalRenderer::new(self.color);
        let mut parser = DiagnosticParser::new();
        let streamed = match child.stderr.take() {
            Some(stderr) => stream_diagnostics(stderr, &mut parser, &renderer, out),
            None => Ok(()),
        };
        let status = child.wait();

        if let Err(source) = streamed {
            return Err(CompileError::Stream { source });
        }
        if let Some(diag) = parser.finish() {
            out.write_str(&renderer.render_summary(&diag));
        }
        let status = status.map_err(|source| CompileError::Stream { source })?;
        Ok((
            status.code().unwrap_or(ABNORMAL_EXIT),
            parser.errors(),
            parser.warnings(),
        ))
    }

    fn report_failure(
        &self,
        err: CompileError,
        output: PathBuf,
        elapsed: Duration,
        out: &mut dyn OutputSink,
    ) -> CompilationResult {
        tracing::debug!(error = %err, "compiler invocation failed");
        out.line(&format!("error: {err}"));
        CompilationResult::abnormal(output, elapsed)
    }

    fn root_relative(&self, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(name.split('/'));
        path
    }
}

fn stream_diagnostics(
    stderr: impl std::io::Read,
    parser: &mut DiagnosticParser,
    renderer: &TerminalRenderer,
    out: &mut dyn OutputSink,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stderr);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&raw);
        if let Some(done) = parser.feed(&line) {
            out.write_str(&renderer.render_summary(&done));
        }
        out.write_str(&renderer.colorize(&line));
        if !line.ends_with('\n') {
            out.write_str("\n");
        }
    }
}

fn split_flags(flags: &str) -> Vec<String> {
    flags.split_whitespace().map(str::to_string).collect()
}
