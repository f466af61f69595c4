//! The include graph and its inversion.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use bake_cache::IncludeEdge;
use bake_common::LogicalFile;

/// Directed "includes" graph over every file reached by discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludeGraph {
    edges: BTreeMap<LogicalFile, Vec<IncludeEdge>>,
}

impl IncludeGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `file` as a node with its outgoing include edges.
    pub fn add_file(&mut self, file: LogicalFile, includes: Vec<IncludeEdge>) {
        self.edges.insert(file, includes);
    }

    /// Returns `true` if `file` is a node.
    pub fn contains(&self, file: &str) -> bool {
        self.edges.contains_key(file)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Reverses every edge.
    pub fn invert(&self) -> IncludedFrom {
        let mut includers: BTreeMap<LogicalFile, BTreeSet<LogicalFile>> = BTreeMap::new();
        for (file, includes) in &self.edges {
            for edge in includes {
                includers
                    .entry(edge.target.clone())
                    .or_default()
                    .insert(file.clone());
            }
        }
        IncludedFrom { includers }
    }
}

/// The inverted include graph: for each file, the files that include it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludedFrom {
    includers: BTreeMap<LogicalFile, BTreeSet<LogicalFile>>,
}

impl IncludedFrom {
    /// Returns the files that directly include `file`.
    pub fn includers(&self, file: &str) -> impl Iterator<Item = &LogicalFile> {
        self.includers.get(file).into_iter().flatten()
    }

    /// Propagates staleness backwards from `modified`.
    ///
    /// Walks breadth-first from every modified file to everything that
    /// includes it, directly or transitively, and returns the members of
    /// `sources` that were reached (modified sources included).
    pub fn propagate(
        &self,
        modified: &BTreeSet<LogicalFile>,
        sources: &BTreeSet<LogicalFile>,
    ) -> BTreeSet<LogicalFile> {
        let mut recompile = BTreeSet::new();
        let mut visited: BTreeSet<&LogicalFile> = modified.iter().collect();
        let mut frontier: VecDeque<&LogicalFile> = modified.iter().collect();

        while let Some(file) = frontier.pop_front() {
            if sources.contains(file) {
                recompile.insert(file.clone());
            }
            for includer in self.includers(file.as_str()) {
                if visited.insert(includer) {
                    frontier.push_back(includer);
                }
            }
        }
        recompile
    }
}
