//! Include-graph discovery and staleness propagation.
//!
//! Discovery runs in three passes:
//!
//! 1. A forward breadth-first walk from the top-level sources through their
//!    includes. Files that are new or newer than their stored time are
//!    rescanned; all others reuse their stored include list.
//! 2. Inversion of the resulting graph into "included from" sets.
//! 3. A backward breadth-first walk from the modified files, collecting every
//!    top-level source it reaches into the recompile set.
//!
//! Include problems are collected as diagnostics rather than stopping the
//! walk, so one run reports all of them.

use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use bake_cache::{DependencyRecord, DependencyState, IncludeEdge};
use bake_common::{LogicalFile, ModTime};
use bake_diagnostics::{Diagnostic, DiagnosticSink, Location, Snippet};

use crate::graph::IncludeGraph;
use crate::resolver::{PathResolver, SOURCE_DIR};
use crate::scanner::{locate_quoted, scan_includes};

/// The outcome of one discovery run.
#[derive(Clone, Debug, Default)]
pub struct Discovery {
    /// Records for every visited file whose includes were all valid.
    pub state: DependencyState,
    /// The current include graph over the same files.
    pub graph: IncludeGraph,
    /// Files that were new or newer than their stored time.
    pub modified: BTreeSet<LogicalFile>,
    /// Top-level sources that must be recompiled, in name order.
    pub recompile: BTreeSet<LogicalFile>,
    /// `false` if any diagnostic was reported.
    pub success: bool,
}

/// Runs discovery over `sources` against the `prior` stored state.
///
/// Problems are emitted to `sink`; the returned [`Discovery`] is only fit for
/// compiling when [`Discovery::success`] is set.
pub fn discover(
    sources: &[LogicalFile],
    prior: &DependencyState,
    resolver: &mut PathResolver,
    sink: &DiagnosticSink,
) -> Discovery {
    let source_set: BTreeSet<LogicalFile> = sources.iter().cloned().collect();
    let mut visited = source_set.clone();
    let mut frontier: VecDeque<LogicalFile> = source_set.iter().cloned().collect();

    let mut state = DependencyState::new();
    let mut graph = IncludeGraph::new();
    let mut modified = BTreeSet::new();
    let mut failures = 0usize;

    while let Some(file) = frontier.pop_front() {
        // Includes are resolved before they are queued, so only top-level
        // sources can fail here.
        let resolved = if source_set.contains(&file) {
            resolve_source(&file, resolver)
        } else {
            resolver.resolve_existing(&file).map_err(|e| e.to_string())
        };
        let path = match resolved {
            Ok(path) => path,
            Err(message) => {
                sink.emit(Diagnostic::fatal(
                    Location::new(format!("{SOURCE_DIR}/{file}"), 1, 1),
                    message,
                ));
                failures += 1;
                continue;
            }
        };
        let display = resolver.display_path(&path);

        let mtime = match ModTime::of_file(&path) {
            Ok(mtime) => mtime,
            Err(e) => {
                sink.emit(Diagnostic::fatal(
                    Location::new(display, 1, 1),
                    format!("cannot read modification time: {e}"),
                ));
                failures += 1;
                continue;
            }
        };

        let mut text = SourceText::new(&path);
        let stored = prior
            .get(file.as_str())
            .filter(|record| !mtime.is_newer_than(record.mtime));

        let candidates: Vec<(Result<LogicalFile, &'static str>, u32)> = match stored {
            Some(record) => {
                tracing::debug!(file = %file, "unmodified, reusing stored includes");
                record
                    .includes
                    .iter()
                    .map(|edge| (Ok(edge.target.clone()), edge.line))
                    .collect()
            }
            None => {
                tracing::debug!(file = %file, "modified, scanning includes");
                modified.insert(file.clone());
                let contents = match text.load() {
                    Ok(contents) => contents,
                    Err(e) => {
                        sink.emit(Diagnostic::fatal(
                            Location::new(display, 1, 1),
                            format!("cannot read file: {e}"),
                        ));
                        failures += 1;
                        continue;
                    }
                };
                scan_includes(&contents.join("\n"))
                    .into_iter()
                    .map(|directive| (include_target(&file, &directive.name), directive.line))
                    .collect()
            }
        };

        let mut includes = Vec::with_capacity(candidates.len());
        let mut file_ok = true;
        for (target, line) in candidates {
            let checked = target
                .map_err(|message| (String::new(), message))
                .and_then(|target| match resolver.resolve(&target).error_message() {
                    None => Ok(target),
                    Some(message) => Err((target.to_string(), message)),
                });
            match checked {
                Ok(target) => includes.push(IncludeEdge::new(target, line)),
                Err((fallback, message)) => {
                    sink.emit(include_diagnostic(&display, line, &fallback, message, &mut text));
                    failures += 1;
                    file_ok = false;
                }
            }
        }

        if !file_ok {
            continue;
        }

        for edge in &includes {
            if visited.insert(edge.target.clone()) {
                frontier.push_back(edge.target.clone());
            }
        }
        graph.add_file(file.clone(), includes.clone());
        state.insert(file, DependencyRecord::new(mtime, includes));
    }

    let recompile = graph.invert().propagate(&modified, &source_set);
    tracing::info!(
        files = state.len(),
        modified = modified.len(),
        recompile = recompile.len(),
        failures,
        "discovery finished"
    );

    Discovery {
        state,
        graph,
        modified,
        recompile,
        success: failures == 0,
    }
}

/// Resolves a top-level source, which must also be recordable in the store.
fn resolve_source(file: &LogicalFile, resolver: &mut PathResolver) -> Result<PathBuf, String> {
    if !file.is_encodable() {
        return Err(format!("{file}: source names may not contain '@' or whitespace"));
    }
    resolver.resolve_existing(file).map_err(|e| e.to_string())
}

/// Turns a written include name into the logical file it denotes.
fn include_target(includer: &LogicalFile, raw: &str) -> Result<LogicalFile, &'static str> {
    let target = if raw.starts_with('.') {
        includer.join_relative(raw)
    } else {
        LogicalFile::new(raw)
    };
    let target = target.ok_or("include escapes the project root")?;
    if target.is_encodable() {
        Ok(target)
    } else {
        Err("include names may not contain '@' or whitespace")
    }
}

fn include_diagnostic(
    display: &str,
    line: u32,
    fallback_name: &str,
    message: &str,
    text: &mut SourceText,
) -> Diagnostic {
    let source_line = text
        .line(line)
        .and_then(|l| locate_quoted(&l).map(|found| (l, found)));

    match source_line {
        Some((source_line, (start, width))) => {
            let name: String = source_line.chars().skip(start + 1).take(width - 2).collect();
            let column = u32::try_from(start + 1).unwrap_or(u32::MAX);
            Diagnostic::fatal(
                Location::new(display, line, column),
                format!("{name}: {message}"),
            )
            .with_snippet(Snippet {
                text: source_line,
                start,
                width,
            })
        }
        None => Diagnostic::fatal(
            Location::new(display, line, 1),
            format!("{fallback_name}: {message}"),
        ),
    }
}

/// The lines of a file, read at most once and only when needed.
struct SourceText {
    path: PathBuf,
    lines: Option<Vec<String>>,
}

impl SourceText {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: None,
        }
    }

    fn load(&mut self) -> std::io::Result<&[String]> {
        if self.lines.is_none() {
            let bytes = std::fs::read(&self.path)?;
            let text = String::from_utf8_lossy(&bytes);
            self.lines = Some(text.lines().map(str::to_string).collect());
        }
        Ok(self.lines.as_deref().unwrap_or_default())
    }

    fn line(&mut self, number: u32) -> Option<String> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.load().ok()?.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn lf(s: &str) -> LogicalFile {
        LogicalFile::new(s).unwrap()
    }

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn run(root: &Path, sources: &[&str], prior: &DependencyState) -> (Discovery, DiagnosticSink) {
        let sources: Vec<_> = sources.iter().map(|s| lf(s)).collect();
        let mut resolver = PathResolver::new(root);
        let sink = DiagnosticSink::new();
        let discovery = discover(&sources, prior, &mut resolver, &sink);
        (discovery, sink)
    }

    fn names(set: &BTreeSet<LogicalFile>) -> Vec<&str> {
        set.iter().map(LogicalFile::as_str).collect()
    }

    #[test]
    fn fresh_project_recompiles_every_source() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "#include \"util.h\"\nint main(){}\n");
        write(dir.path(), "src/util.c", "#include \"util.h\"\n");
        write(dir.path(), "include/util.h", "#include <stdio.h>\n");

        let (d, sink) = run(dir.path(), &["main.c", "util.c"], &DependencyState::new());
        assert!(d.success);
        assert!(!sink.has_errors());
        assert_eq!(names(&d.recompile), vec!["main.c", "util.c"]);
        assert_eq!(names(&d.modified), vec!["main.c", "util.c", "util.h"]);
        assert_eq!(d.state.len(), 3);
        assert_eq!(
            d.state.get("main.c").unwrap().includes,
            vec![IncludeEdge::new(lf("util.h"), 1)]
        );
        assert!(d.graph.contains("util.h"));
        assert_eq!(d.graph.len(), 3);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "#include \"a.h\"\n");
        write(dir.path(), "include/a.h", "");

        let (first, _) = run(dir.path(), &["main.c"], &DependencyState::new());
        let (second, _) = run(dir.path(), &["main.c"], &first.state);
        assert!(second.success);
        assert!(second.modified.is_empty());
        assert!(second.recompile.is_empty());
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn unmodified_files_reuse_stored_includes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "#include \"a.h\"\n");
        write(dir.path(), "include/a.h", "");
        write(dir.path(), "include/b.h", "");

        // The store claims main.c includes b.h at line 7 and is newer than the file.
        let mut prior = DependencyState::new();
        prior.insert(
            lf("main.c"),
            DependencyRecord::new(
                ModTime::from_secs(f64::MAX),
                vec![IncludeEdge::new(lf("b.h"), 7)],
            ),
        );
        prior.insert(lf("b.h"), DependencyRecord::new(ModTime::from_secs(f64::MAX), vec![]));
        let (d, _) = run(dir.path(), &["main.c"], &prior);
        assert!(d.success);
        assert_eq!(
            d.state.get("main.c").unwrap().includes,
            vec![IncludeEdge::new(lf("b.h"), 7)]
        );
        assert!(d.graph.contains("b.h"));
        assert!(!d.graph.contains("a.h"));
        assert!(d.modified.is_empty());
        assert!(d.recompile.is_empty());
    }

    #[test]
    fn relative_includes_resolve_against_the_including_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/net/socket.c", "#include \"./socket_impl.h\"\n#include \"../common.h\"\n");
        write(dir.path(), "src/net/socket_impl.h", "");
        write(dir.path(), "include/common.h", "");

        let (d, _) = run(dir.path(), &["net/socket.c"], &DependencyState::new());
        assert!(d.success);
        let targets: Vec<_> = d
            .state
            .get("net/socket.c")
            .unwrap()
            .includes
            .iter()
            .map(|e| e.target.as_str())
            .collect();
        assert_eq!(targets, vec!["net/socket_impl.h", "common.h"]);
    }

    #[test]
    fn missing_include_is_reported_with_snippet() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "int x;\n#include \"missing.h\"\n");

        let (d, sink) = run(dir.path(), &["main.c"], &DependencyState::new());
        assert!(!d.success);
        assert!(d.state.get("main.c").is_none());

        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        let diag = &diags[0];
        assert_eq!(diag.location, Location::new("src/main.c", 2, 10));
        assert_eq!(diag.message, "missing.h: No such file or directory");
        let snippet = diag.snippet.as_ref().unwrap();
        assert_eq!(snippet.text, "#include \"missing.h\"");
        assert_eq!((snippet.start, snippet.width), (9, 11));
    }

    #[test]
    fn every_problem_is_reported_in_one_pass() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.c", "#include \"gone.h\"\n");
        write(dir.path(), "src/b.c", "#include \"dup.h\"\n#include \"../../up.h\"\n");
        write(dir.path(), "src/dup.h", "");
        write(dir.path(), "include/dup.h", "");

        let (d, sink) = run(dir.path(), &["a.c", "b.c"], &DependencyState::new());
        assert!(!d.success);
        let messages: Vec<_> = sink.diagnostics().into_iter().map(|d| d.message).collect();
        assert_eq!(
            messages,
            vec![
                "gone.h: No such file or directory".to_string(),
                "dup.h: Ambiguous file include".to_string(),
                "../../up.h: include escapes the project root".to_string(),
            ]
        );
    }

    #[test]
    fn unencodable_include_names_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/a.c", "#include \"we@ird.h\"\n");
        write(dir.path(), "include/we@ird.h", "");

        let (d, sink) = run(dir.path(), &["a.c"], &DependencyState::new());
        assert!(!d.success);
        assert!(sink.diagnostics()[0].message.starts_with("we@ird.h: "));
    }

    #[test]
    fn failing_files_do_not_hide_healthy_ones() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/bad.c", "#include \"nope.h\"\n#include \"ok.h\"\n");
        write(dir.path(), "src/good.c", "#include \"ok.h\"\n");
        write(dir.path(), "include/ok.h", "");

        let (d, _) = run(dir.path(), &["bad.c", "good.c"], &DependencyState::new());
        assert!(!d.success);
        assert!(d.state.get("bad.c").is_none());
        assert!(d.state.get("good.c").is_some());
        assert!(d.state.get("ok.h").is_some());
    }

    #[test]
    fn ambiguous_top_level_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "");
        write(dir.path(), "include/main.c", "");

        let (d, sink) = run(dir.path(), &["main.c"], &DependencyState::new());
        assert!(!d.success);
        assert_eq!(sink.diagnostics()[0].message, "main.c: Ambiguous file include");
    }

    #[test]
    fn missing_top_level_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();

        let (d, sink) = run(dir.path(), &["gone.c"], &DependencyState::new());
        assert!(!d.success);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.location, Location::new("src/gone.c", 1, 1));
        assert_eq!(diag.message, "gone.c: No such file or directory");
    }

    #[test]
    fn unrecordable_source_names_fail_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/my file.c", "int x;\n");
        write(dir.path(), "src/v@2.c", "int y;\n");
        write(dir.path(), "src/ok.c", "int z;\n");

        let (d, sink) = run(dir.path(), &["my file.c", "ok.c", "v@2.c"], &DependencyState::new());
        assert!(!d.success);
        assert_eq!(sink.error_count(), 2);
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.location, Location::new("src/my file.c", 1, 1));
        assert_eq!(diag.message, "my file.c: source names may not contain '@' or whitespace");
        assert!(d.state.get("my file.c").is_none());
        assert!(d.state.get("v@2.c").is_none());
        assert!(d.state.get("ok.c").is_some());
    }

    #[test]
    fn unreachable_files_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.c", "");
        let mut prior = DependencyState::new();
        prior.insert(lf("old.h"), DependencyRecord::new(ModTime::from_secs(1.0), vec![]));

        let (d, _) = run(dir.path(), &["main.c"], &prior);
        assert!(d.state.get("old.h").is_none());
        assert_eq!(d.state.len(), 1);
    }
}
