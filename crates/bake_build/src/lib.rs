//! The incremental build: discovery, compilation, linking and write-back.
//!
//! [`Build::run`] sequences one invocation for a resolved
//! [`BuildProfile`](bake_config::BuildProfile) and reports what happened in a
//! [`BuildReport`]. The optional statistics table is produced by
//! [`format_stats`].

#![warn(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod stats;

pub use error::BuildError;
pub use orchestrator::{Build, BuildOptions, BuildReport};
pub use stats::format_stats;
