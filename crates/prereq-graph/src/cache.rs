//! Memoized graph construction keyed by edge-set content.
//!
//! Building a graph is cheap, but recommender-style callers rebuild the same
//! curriculum on every request. [`GraphCache`] keys finished graphs by the
//! same BLAKE3 hash [`PrerequisiteGraph::content_hash`] reports, computed from
//! the deduplicated, sorted input, so any permutation of the same edges hits
//! the same entry. Failed constructions are never cached.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::trace;

use crate::error::GraphResult;
use crate::graph::PrerequisiteGraph;
use crate::graph::build::hash_content;

/// A cache of built graphs, keyed by content hash.
#[derive(Debug, Default)]
pub struct GraphCache {
    entries: HashMap<String, Arc<PrerequisiteGraph>>,
    hits: u64,
    misses: u64,
}

impl GraphCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the graph for `edges`, building it on first use.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::from_edges`]. Errors are not cached.
    pub fn get_or_build<I, P, D>(&mut self, edges: I) -> GraphResult<Arc<PrerequisiteGraph>>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: AsRef<str>,
    {
        let edges: BTreeSet<(String, String)> = edges
            .into_iter()
            .map(|(p, d)| (p.as_ref().to_string(), d.as_ref().to_string()))
            .collect();
        let topics: BTreeSet<String> = edges
            .iter()
            .flat_map(|(p, d)| [p.clone(), d.clone()])
            .collect();
        let key = hash_content(&edges, &topics);

        if let Some(graph) = self.entries.get(&key) {
            self.hits += 1;
            trace!(%key, "graph cache hit");
            return Ok(Arc::clone(graph));
        }

        self.misses += 1;
        trace!(%key, "graph cache miss");
        let graph = Arc::new(PrerequisiteGraph::from_edges(edges)?);
        self.entries.insert(key, Arc::clone(&graph));
        Ok(graph)
    }

    /// Number of cached graphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to build (including failed builds).
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every cached graph. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
