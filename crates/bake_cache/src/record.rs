//! In-memory form of the dependency store.

use std::collections::btree_map;
use std::collections::BTreeMap;

use bake_common::{LogicalFile, ModTime};

/// One `#include "..."` directive found in a file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IncludeEdge {
    /// The included file, already resolved against relative prefixes.
    pub target: LogicalFile,
    /// The 1-based line of the directive in the including file.
    pub line: u32,
}

impl IncludeEdge {
    /// Creates an include edge.
    pub fn new(target: LogicalFile, line: u32) -> Self {
        Self { target, line }
    }
}

/// What the store remembers about one file.
#[derive(Clone, Debug, PartialEq)]
pub struct DependencyRecord {
    /// The modification time the file had when its includes were scanned.
    pub mtime: ModTime,
    /// The file's includes in source order.
    pub includes: Vec<IncludeEdge>,
}

impl DependencyRecord {
    /// Creates a record.
    pub fn new(mtime: ModTime, includes: Vec<IncludeEdge>) -> Self {
        Self { mtime, includes }
    }
}

/// Records for every known file, ordered by name.
///
/// Two states are equal exactly when they would be written out as the same
/// bytes, which is what the write-back skip relies on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DependencyState {
    records: BTreeMap<LogicalFile, DependencyRecord>,
}

impl DependencyState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `file`.
    pub fn get(&self, file: &str) -> Option<&DependencyRecord> {
        self.records.get(file)
    }

    /// Returns `true` if `file` has a record.
    pub fn contains(&self, file: &str) -> bool {
        self.records.contains_key(file)
    }

    /// Inserts or replaces the record for `file`.
    pub fn insert(&mut self, file: LogicalFile, record: DependencyRecord) {
        self.records.insert(file, record);
    }

    /// Removes and returns the record for `file`.
    pub fn remove(&mut self, file: &str) -> Option<DependencyRecord> {
        self.records.remove(file)
    }

    /// Number of files with a record.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no file has a record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, LogicalFile, DependencyRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a DependencyState {
    type Item = (&'a LogicalFile, &'a DependencyRecord);
    type IntoIter = btree_map::Iter<'a, LogicalFile, DependencyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<(LogicalFile, DependencyRecord)> for DependencyState {
    fn from_iter<I: IntoIterator<Item = (LogicalFile, DependencyRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
