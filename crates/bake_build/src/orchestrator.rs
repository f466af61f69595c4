//! One incremental build invocation.
//!
//! Sequence:
//! 1. List the translation units under `src/`.
//! 2. Load the dependency store of the build mode.
//! 3. Discover the include graph and the recompile set. Any discovery
//!    problem aborts the build before compiling, with nothing persisted.
//! 4. Compile the recompile set on the worker pool.
//! 5. Link if everything compiled and something was recompiled.
//! 6. Drop failed or skipped sources from the new state and write the store
//!    if it changed.
//! 7. Write the statistics table if one is configured.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bake_cache::{DependencyState, DependencyStore};
use bake_common::LogicalFile;
use bake_compile::{CompilationResult, Invoker, OutputSink, WorkerPool};
use bake_config::BuildProfile;
use bake_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use bake_source::{collect_sources, discover, PathResolver, SOURCE_DIR};

use crate::error::BuildError;
use crate::stats::format_stats;

/// Presentation settings for a build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Tint compiler output with ANSI colors.
    pub color: bool,
    /// Suppress the status lines.
    pub quiet: bool,
}

/// What one invocation did.
#[derive(Clone, Debug, Default)]
pub struct BuildReport {
    /// `true` if discovery, every compilation and the link succeeded.
    pub success: bool,
    /// Sources whose objects were rebuilt successfully, in name order.
    pub recompiled: Vec<LogicalFile>,
    /// Every compile and link result, in completion order.
    pub results: Vec<CompilationResult>,
    /// `true` if the dependency store was rewritten.
    pub store_written: bool,
}

/// An incremental build of one project for one resolved profile.
pub struct Build<'a> {
    root: &'a Path,
    profile: &'a BuildProfile,
    options: BuildOptions,
}

impl<'a> Build<'a> {
    /// Prepares a build of the project at `root`.
    pub fn new(root: &'a Path, profile: &'a BuildProfile, options: BuildOptions) -> Self {
        Self {
            root,
            profile,
            options,
        }
    }

    /// Path of the dependency store this build reads and writes.
    pub fn store_path(&self) -> PathBuf {
        self.root.join(self.profile.dependency_file())
    }

    /// Runs the build, writing compiler output and diagnostics to `console`.
    pub fn run(&self, console: &mut dyn OutputSink) -> Result<BuildReport, BuildError> {
        let started = Instant::now();

        let sources = collect_sources(self.root).map_err(|source| BuildError::Sources {
            path: self.root.join(SOURCE_DIR),
            source,
        })?;

        let store = DependencyStore::new(self.store_path());
        let loaded = match store.load() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable dependency store, rebuilding everything");
                DependencyState::new()
            }
        };

        self.status("Discovering", &format!("{} source files", sources.len()));
        let mut resolver = PathResolver::new(self.root);
        let sink = DiagnosticSink::new();
        let discovery = discover(&sources, &loaded, &mut resolver, &sink);

        if !discovery.success {
            let renderer = TerminalRenderer::new(self.options.color);
            for diag in sink.take_all() {
                console.write_str(&renderer.render(&diag));
            }
            eprintln!("error: file discovery failed");
            return Ok(BuildReport::default());
        }

        let recompile: Vec<LogicalFile> = discovery.recompile.iter().cloned().collect();
        let mut new_state = discovery.state;
        let mut results = Vec::with_capacity(recompile.len() + 1);
        let mut success = true;
        let mut recompiled = BTreeSet::new();

        let invoker = Invoker::new(self.root, self.profile, self.options.color)?;

        if !recompile.is_empty() {
            let pool = WorkerPool::new(self.profile.threads)?;
            self.status(
                "Compiling",
                &format!(
                    "{} file{} ({} worker{})",
                    recompile.len(),
                    plural(recompile.len()),
                    pool.workers(),
                    plural(pool.workers())
                ),
            );
            let outcomes = pool.run(
                &recompile,
                |file: &LogicalFile, out: &mut dyn OutputSink| invoker.compile_one(file, out),
                console,
            );
            for outcome in outcomes {
                if outcome.result.success() {
                    recompiled.insert(outcome.task);
                } else {
                    success = false;
                }
                results.push(outcome.result);
            }
            if recompiled.len() != recompile.len() {
                success = false;
            }
        }

        for file in recompile.iter().filter(|f| !recompiled.contains(*f)) {
            tracing::debug!(file = %file, "not compiled, forgetting its dependency record");
            new_state.remove(file.as_str());
        }

        if success && !recompile.is_empty() {
            self.status("Linking", &self.profile.program);
            let result = invoker.link(&sources, console);
            success = result.success();
            results.push(result);
        } else if success {
            self.status("Finished", "nothing to do");
        }

        let store_written = store.save_if_changed(&loaded, &new_state)?;

        if let Some(stats_file) = &self.profile.stats_file {
            let path = self.root.join(stats_file);
            std::fs::write(&path, format_stats(self.root, &results))
                .map_err(|source| BuildError::Stats { path, source })?;
        }

        if success {
            if !recompile.is_empty() {
                self.status(
                    "Finished",
                    &format!(
                        "{} build in {:.2}s",
                        mode_name(self.profile),
                        started.elapsed().as_secs_f64()
                    ),
                );
            }
        } else {
            eprintln!("error: compilation failed");
        }

        tracing::info!(
            success,
            recompiled = recompiled.len(),
            store_written,
            "build finished"
        );

        Ok(BuildReport {
            success,
            recompiled: recompiled.into_iter().collect(),
            results,
            store_written,
        })
    }

    fn status(&self, verb: &str, detail: &str) {
        if !self.options.quiet {
            eprintln!("{verb:>12} {detail}");
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn mode_name(profile: &BuildProfile) -> &'static str {
    match profile.mode {
        bake_config::BuildMode::Release => "release",
        bake_config::BuildMode::Debug => "debug",
    }
}
