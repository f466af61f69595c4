//! Shared foundational types used across the bake build engine.
//!
//! This crate provides the project-relative [`LogicalFile`] name used as a map
//! key by every stage, the [`ModTime`] timestamp persisted in the dependency
//! store, and the host platform facts that seed conditional compiler flags.

#![warn(missing_docs)]

pub mod logical;
pub mod mtime;
pub mod platform;

pub use logical::{LogicalFile, SourceKind};
pub use mtime::{ModTime, ParseModTimeError};
pub use platform::{host_flags, program_filename};
