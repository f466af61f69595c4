//! End-to-end incremental builds against a stand-in compiler.
//!
//! The stand-in is a POSIX shell script that creates whatever file follows
//! `-o` and fails, with a GCC-style error, for any source containing the word
//! `FAIL`. Sources containing `SLOW` take a second to compile.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use bake_build::{Build, BuildOptions, BuildReport};
use bake_cache::DependencyStore;
use bake_compile::Buffered;
use bake_config::{load_config_from_str, resolve_profile, BuildMode};

const FAKE_CC: &str = r#"#!/bin/sh
out=""
src=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  case "$arg" in src/*) src="$arg" ;; esac
  prev="$arg"
done
if [ -n "$src" ] && grep -q SLOW "$src"; then
  sleep 1
fi
if [ -n "$src" ] && grep -q FAIL "$src"; then
  echo "$src:1:1: error: requested failure" >&2
  exit 1
fi
mkdir -p "$(dirname "$out")"
: > "$out"
exit 0
"#;

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fakecc.sh"), FAKE_CC).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    /// Rewrites a file and moves its modification time clearly forward.
    fn touch(&self, rel: &str) {
        let path = self.root().join(rel);
        let contents = fs::read_to_string(&path).unwrap();
        fs::write(&path, format!("{contents}\n")).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();
    }

    fn build_with(&self, mode: BuildMode, extra: serde_json::Value) -> BuildReport {
        let mut json = serde_json::json!({
            "program": "app",
            "cc": format!("sh {}", self.root().join("fakecc.sh").display()),
            "cxx": format!("sh {}", self.root().join("fakecc.sh").display()),
            "threads": 1,
        });
        if let (Some(base), Some(extra)) = (json.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        let config = load_config_from_str(&json.to_string()).unwrap();
        let profile = resolve_profile(&config, mode).unwrap();
        let options = BuildOptions {
            color: false,
            quiet: true,
        };
        let mut console = Buffered::new();
        Build::new(self.root(), &profile, options)
            .run(&mut console)
            .unwrap()
    }

    fn build(&self) -> BuildReport {
        self.build_with(BuildMode::Release, serde_json::json!({}))
    }

    fn store_text(&self, name: &str) -> String {
        fs::read_to_string(self.root().join(name)).unwrap()
    }

    fn stored_files(&self) -> Vec<String> {
        let state = DependencyStore::new(self.root().join(".bake-dependencies.txt"))
            .load()
            .unwrap();
        state.iter().map(|(name, _)| name.to_string()).collect()
    }
}

fn names(report: &BuildReport) -> Vec<&str> {
    report.recompiled.iter().map(|f| f.as_str()).collect()
}

fn sample() -> Project {
    let project = Project::new();
    project
        .file("src/a.c", "#include \"h1.h\"\nint a;\n")
        .file("src/b.c", "#include \"other.h\"\nint b;\n")
        .file("src/main.c", "#include \"h1.h\"\n#include \"other.h\"\nint main(void){return 0;}\n")
        .file("include/h1.h", "#include \"h2.h\"\n")
        .file("include/h2.h", "#define H2 1\n")
        .file("include/other.h", "");
    project
}

#[test]
fn first_build_compiles_everything_and_links() {
    let project = sample();
    let report = project.build();

    assert!(report.success);
    assert_eq!(names(&report), vec!["a.c", "b.c", "main.c"]);
    assert_eq!(report.results.len(), 4);
    assert!(report.store_written);
    assert!(project.root().join("obj/a.o").exists());
    assert!(project.root().join("app").exists());
    assert_eq!(
        project.stored_files(),
        vec!["a.c", "b.c", "h1.h", "h2.h", "main.c", "other.h"]
    );
}

#[test]
fn second_build_without_changes_is_a_no_op() {
    let project = sample();
    project.build();
    let before = project.store_text(".bake-dependencies.txt");

    let report = project.build();
    assert!(report.success);
    assert!(report.recompiled.is_empty());
    assert!(report.results.is_empty());
    assert!(!report.store_written);
    assert_eq!(project.store_text(".bake-dependencies.txt"), before);
}

#[test]
fn header_change_propagates_transitively() {
    let project = sample();
    project.build();
    let b_line = |text: &str| text.lines().find(|l| l.starts_with("b.c ")).map(str::to_string);
    let b_before = b_line(&project.store_text(".bake-dependencies.txt"));

    project.touch("include/h2.h");
    let report = project.build();

    assert!(report.success);
    assert_eq!(names(&report), vec!["a.c", "main.c"]);
    assert!(report.store_written);
    // b.c does not reach h2.h, so its record is carried over untouched.
    assert_eq!(b_line(&project.store_text(".bake-dependencies.txt")), b_before);
}

#[test]
fn new_include_is_followed() {
    let project = sample();
    project.build();

    project.file("include/extra.h", "");
    project.file("src/b.c", "#include \"other.h\"\n#include \"extra.h\"\nint b;\n");
    project.touch("src/b.c");
    let report = project.build();

    assert_eq!(names(&report), vec!["b.c"]);
    assert!(project.stored_files().contains(&"extra.h".to_string()));
}

#[test]
fn ambiguous_header_fails_discovery() {
    let project = sample();
    project.file("src/h1.h", "#include \"h2.h\"\n");

    let report = project.build();
    assert!(!report.success);
    assert!(report.results.is_empty());
    assert!(!project.root().join(".bake-dependencies.txt").exists());
    assert!(!project.root().join("obj").exists());
}

#[test]
fn partial_failure_forgets_only_the_failed_file() {
    let project = sample();
    project.file("src/zz.c", "FAIL\n#include \"other.h\"\n");

    let report = project.build();
    assert!(!report.success);
    assert_eq!(names(&report), vec!["a.c", "b.c", "main.c"]);
    // three compilations plus the failed one, and no link
    assert_eq!(report.results.len(), 4);
    assert!(report.results.iter().all(|r| !r.output.ends_with("app")));
    assert!(!project.root().join("app").exists());

    let stored = project.stored_files();
    assert!(!stored.contains(&"zz.c".to_string()));
    assert!(stored.contains(&"a.c".to_string()));
    assert!(stored.contains(&"other.h".to_string()));

    // Fixing the file recompiles just that file and links.
    project.file("src/zz.c", "#include \"other.h\"\n");
    let report = project.build();
    assert!(report.success);
    assert_eq!(names(&report), vec!["zz.c"]);
    assert!(project.root().join("app").exists());
}

#[test]
fn parallel_failure_in_the_middle_forgets_only_that_file() {
    let project = sample();
    project.file("src/b.c", "SLOW FAIL\n#include \"other.h\"\n");

    let report = project.build_with(BuildMode::Release, serde_json::json!({ "threads": 3 }));
    assert!(!report.success);
    assert_eq!(names(&report), vec!["a.c", "main.c"]);
    assert_eq!(report.results.len(), 3);
    assert!(report.results.iter().all(|r| !r.output.ends_with("app")));
    assert!(!project.root().join("app").exists());

    let stored = project.stored_files();
    assert_eq!(stored, vec!["a.c", "h1.h", "h2.h", "main.c", "other.h"]);
}

#[test]
fn unrecordable_source_name_fails_before_compiling() {
    let project = sample();
    project.file("src/my file.c", "int x;\n");

    let report = project.build();
    assert!(!report.success);
    assert!(report.results.is_empty());
    assert!(!project.root().join("obj").exists());
    assert!(!project.root().join("app").exists());
    assert!(!project.root().join(".bake-dependencies.txt").exists());
}

#[test]
fn sequential_build_skips_everything_after_a_failure() {
    let project = sample();
    project.file("src/a.c", "FAIL\n");

    let report = project.build();
    assert!(!report.success);
    assert!(report.recompiled.is_empty());
    assert_eq!(report.results.len(), 1);

    let stored = project.stored_files();
    for skipped in ["a.c", "b.c", "main.c"] {
        assert!(!stored.contains(&skipped.to_string()), "{skipped} should be forgotten");
    }
}

#[test]
fn parallel_and_sequential_builds_persist_the_same_state() {
    let project = sample();
    project.file("src/net/socket.c", "#include \"./socket.h\"\n#include \"h1.h\"\n");
    project.file("src/net/socket.h", "");

    let sequential = project.build();
    assert!(sequential.success);
    let sequential_store = project.store_text(".bake-dependencies.txt");

    fs::remove_file(project.root().join(".bake-dependencies.txt")).unwrap();
    fs::remove_dir_all(project.root().join("obj")).unwrap();

    let parallel = project.build_with(BuildMode::Release, serde_json::json!({ "threads": 4 }));
    assert!(parallel.success);
    assert_eq!(parallel.recompiled, sequential.recompiled);
    assert_eq!(project.store_text(".bake-dependencies.txt"), sequential_store);
}

#[test]
fn debug_build_uses_its_own_store_and_prefix() {
    let project = sample();
    let report = project.build_with(BuildMode::Debug, serde_json::json!({}));

    assert!(report.success);
    assert!(project.root().join(".bake-dependencies-dbg.txt").exists());
    assert!(!project.root().join(".bake-dependencies.txt").exists());
    assert!(project.root().join("obj/dbg-main.o").exists());
    assert!(project.root().join("dbg-app").exists());

    // The release build is still cold.
    let release = project.build();
    assert_eq!(release.recompiled.len(), 3);
}

#[test]
fn corrupt_store_means_full_rebuild() {
    let project = sample();
    project.build();
    fs::write(project.root().join(".bake-dependencies.txt"), "a.c not-a-time\n").unwrap();

    let report = project.build();
    assert!(report.success);
    assert_eq!(report.recompiled.len(), 3);
    assert!(report.store_written);
    assert_eq!(project.stored_files().len(), 6);
}

#[test]
fn removed_source_is_dropped_from_the_store() {
    let project = sample();
    project.build();
    fs::remove_file(project.root().join("src/b.c")).unwrap();

    let report = project.build();
    assert!(report.success);
    assert!(report.recompiled.is_empty());
    assert!(report.store_written);
    assert!(!project.stored_files().contains(&"b.c".to_string()));
}

#[test]
fn statistics_table_is_written() {
    let project = sample();
    let report = project.build_with(
        BuildMode::Release,
        serde_json::json!({ "build-stats-file": "stats.txt" }),
    );
    assert!(report.success);

    let table = fs::read_to_string(project.root().join("stats.txt")).unwrap();
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("filename"));
    let outputs: Vec<PathBuf> = lines[1..]
        .iter()
        .map(|l| PathBuf::from(l.split(" ; ").next().unwrap().trim()))
        .collect();
    assert!(outputs.contains(&PathBuf::from("obj/main.o")));
    assert!(outputs.contains(&PathBuf::from("app")));
}
