//! Thread-shared access to one graph instance.
//!
//! [`SharedGraph`] puts a [`PrerequisiteGraph`] behind an `Arc<RwLock<_>>`:
//! any number of readers may query concurrently, and a mutation waits for
//! every in-flight read and blocks new ones until it finishes. Clones share
//! the same underlying graph.
//!
//! Mutations validate before they touch the graph, so a panic while a lock is
//! held cannot leave it half-updated; a poisoned lock is therefore recovered
//! rather than propagated.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::GraphResult;
use crate::graph::PrerequisiteGraph;

/// A cloneable handle to a lock-guarded [`PrerequisiteGraph`].
#[derive(Debug, Clone, Default)]
pub struct SharedGraph {
    inner: Arc<RwLock<PrerequisiteGraph>>,
}

impl SharedGraph {
    /// Wrap an already-built graph.
    #[must_use]
    pub fn new(graph: PrerequisiteGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Run a read-only query under the shared lock.
    pub fn read<R>(&self, query: impl FnOnce(&PrerequisiteGraph) -> R) -> R {
        query(&self.read_guard())
    }

    /// Add an edge under the exclusive lock.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::add_edge`]; the graph is unchanged on
    /// error.
    pub fn add_edge(&self, prerequisite: &str, dependent: &str) -> GraphResult<()> {
        self.write_guard().add_edge(prerequisite, dependent)
    }

    /// Register an isolated topic under the exclusive lock.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::add_topic`].
    pub fn add_topic(&self, topic: &str) -> GraphResult<()> {
        self.write_guard().add_topic(topic)
    }

    /// Next topics for `known`, computed under the shared lock.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::next_topics`].
    pub fn next_topics<I, S>(&self, known: I) -> GraphResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.read_guard().next_topics(known)
    }

    /// Topological order, computed under the shared lock.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::topological_order`].
    pub fn topological_order(&self) -> GraphResult<Vec<String>> {
        self.read_guard().topological_order()
    }

    /// An owned copy of the current graph.
    #[must_use]
    pub fn snapshot(&self) -> PrerequisiteGraph {
        self.read_guard().clone()
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, PrerequisiteGraph> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, PrerequisiteGraph> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<PrerequisiteGraph> for SharedGraph {
    fn from(graph: PrerequisiteGraph) -> Self {
        Self::new(graph)
    }
}
