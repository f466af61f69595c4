//! Source tree model for the bake build engine.
//!
//! Maps logical file names onto the `src/` and `include/` trees, scans files
//! for quoted includes, and runs the discovery passes that decide which
//! translation units are stale.

#![warn(missing_docs)]

pub mod discover;
pub mod graph;
pub mod resolver;
pub mod scanner;
pub mod sources;

pub use discover::{discover, Discovery};
pub use graph::{IncludeGraph, IncludedFrom};
pub use resolver::{EffectivePath, PathResolver, ResolveError, INCLUDE_DIR, SOURCE_DIR};
pub use scanner::{locate_quoted, scan_includes, IncludeDirective};
pub use sources::collect_sources;
