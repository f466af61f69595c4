//! Persisted dependency state for incremental rebuilds.
//!
//! Each build mode keeps one plain-text store at the project root that
//! records, per known file, the modification time it had when last scanned and
//! the quoted includes found in it. The next invocation compares those times
//! against the filesystem to decide what must be rescanned and recompiled.

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod store;

pub use error::CacheError;
pub use record::{DependencyRecord, DependencyState, IncludeEdge};
pub use store::DependencyStore;
