//! Graph construction and mutation.
//!
//! # Edge Direction
//!
//! An edge `A → B` means "A is a **prerequisite** of B": A must be learned
//! before B. Input pairs are always `(prerequisite, dependent)`, so the pair
//! `("Arrays", "Sorting")` inserts `Arrays → Sorting`.
//!
//! A curriculum table in the `topic → [prerequisites]` shape is flattened
//! into the same pairs by [`PrerequisiteGraph::from_prerequisite_map`].
//!
//! ## Validation
//!
//! Pairs are checked one at a time (self-loops and blank topics are rejected
//! immediately) and the finished edge set is checked once for cycles. A
//! failed construction produces no graph at all. Incremental
//! [`PrerequisiteGraph::add_edge`] checks reachability before touching the
//! graph, so a rejected edge leaves it exactly as it was.
//!
//! ## Content Hash
//!
//! [`PrerequisiteGraph::content_hash`] is a BLAKE3 hash over the sorted edge
//! list and sorted topic list. Two graphs with the same logical content hash
//! equally regardless of insertion order.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, warn};

use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult, InvalidEdgeReason};
use crate::graph::cycles;

// ---------------------------------------------------------------------------
// PrerequisiteGraph
// ---------------------------------------------------------------------------

/// An acyclic topic prerequisite graph.
///
/// Nodes are topic identifiers. An edge `A → B` means "A is a prerequisite
/// of B". The graph owns its topic and edge sets; every query returns owned
/// data.
#[derive(Debug, Clone, Default)]
pub struct PrerequisiteGraph {
    /// Directed graph: nodes = topics, edges = prerequisite relationships.
    pub(crate) graph: DiGraph<String, ()>,
    /// Mapping from topic to petgraph `NodeIndex`.
    pub(crate) node_map: HashMap<String, NodeIndex>,
    pub(crate) config: GraphConfig,
}

impl PrerequisiteGraph {
    /// Create an empty graph with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with the given config.
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a graph from `(prerequisite, dependent)` pairs.
    ///
    /// Duplicate pairs collapse to a single edge.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidEdge`] for a self-referential or blank pair.
    /// - [`GraphError::Cycle`] if the edge set contains a directed cycle.
    pub fn from_edges<I, P, D>(edges: I) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: AsRef<str>,
    {
        Self::from_edges_with_config(edges, GraphConfig::default())
    }

    /// Build a graph from `(prerequisite, dependent)` pairs with an explicit
    /// config.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::from_edges`].
    #[instrument(skip(edges, config))]
    pub fn from_edges_with_config<I, P, D>(edges: I, config: GraphConfig) -> GraphResult<Self>
    where
        I: IntoIterator<Item = (P, D)>,
        P: AsRef<str>,
        D: AsRef<str>,
    {
        let mut built = Self::with_config(config);
        for (prerequisite, dependent) in edges {
            built.insert_edge_unchecked(prerequisite.as_ref(), dependent.as_ref())?;
        }
        built.finish()
    }

    /// Build a graph from a `topic → [prerequisites]` table.
    ///
    /// Keys with an empty prerequisite list become isolated topics rather
    /// than disappearing.
    ///
    /// # Errors
    ///
    /// Same as [`PrerequisiteGraph::from_edges`]; a blank key is reported as
    /// [`InvalidEdgeReason::EmptyTopic`].
    #[instrument(skip(map))]
    pub fn from_prerequisite_map<M, K, V, S>(map: M) -> GraphResult<Self>
    where
        M: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut built = Self::new();
        for (topic, prerequisites) in map {
            let topic = topic.as_ref();
            built.add_topic(topic)?;
            for prerequisite in prerequisites {
                built.insert_edge_unchecked(prerequisite.as_ref(), topic)?;
            }
        }
        built.finish()
    }

    /// Add a single prerequisite edge.
    ///
    /// Re-adding an existing edge is a no-op.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidEdge`] for a self-referential or blank pair.
    /// - [`GraphError::Cycle`] if the edge would close a cycle. The graph is
    ///   left unchanged.
    pub fn add_edge(&mut self, prerequisite: &str, dependent: &str) -> GraphResult<()> {
        validate_pair(prerequisite, dependent)?;

        // A brand-new endpoint has no edges yet, so only an edge between two
        // existing topics can close a cycle.
        if let (Some(from), Some(to)) = (self.node_index(prerequisite), self.node_index(dependent))
        {
            if self.graph.contains_edge(from, to) {
                return Ok(());
            }
            if let Some(shortest) = cycles::would_create_cycle(&self.graph, from, to) {
                let mut trial = self.graph.clone();
                trial.add_edge(from, to, ());
                let path = cycles::stalled_cycle(&trial).unwrap_or(shortest);
                warn!(prerequisite, dependent, cycle = ?path, "rejected edge closing a cycle");
                return Err(GraphError::cycle(path));
            }
        }

        let from = self.ensure_node(prerequisite);
        let to = self.ensure_node(dependent);
        self.graph.add_edge(from, to, ());
        debug!(prerequisite, dependent, "added prerequisite edge");
        Ok(())
    }

    /// Register a topic without any edges. No-op if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidEdge`] with
    /// [`InvalidEdgeReason::EmptyTopic`] for a blank identifier.
    pub fn add_topic(&mut self, topic: &str) -> GraphResult<()> {
        if topic.is_empty() {
            return Err(GraphError::invalid_edge(
                topic,
                topic,
                InvalidEdgeReason::EmptyTopic,
            ));
        }
        self.ensure_node(topic);
        Ok(())
    }

    /// Engine config in effect for this graph.
    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Replace the engine config.
    pub const fn set_config(&mut self, config: GraphConfig) {
        self.config = config;
    }

    /// Return the number of topics (nodes) in the graph.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of prerequisite edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if the graph has no topics.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Return `true` if `topic` is a node of the graph.
    #[must_use]
    pub fn contains_topic(&self, topic: &str) -> bool {
        self.node_map.contains_key(topic)
    }

    /// Return `true` if `prerequisite → dependent` is a direct edge.
    #[must_use]
    pub fn contains_edge(&self, prerequisite: &str, dependent: &str) -> bool {
        match (self.node_index(prerequisite), self.node_index(dependent)) {
            (Some(from), Some(to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// All topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.node_map.keys().cloned().collect();
        topics.sort_unstable();
        topics
    }

    /// All `(prerequisite, dependent)` edges, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges: Vec<(String, String)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.topic_name(e.source()).to_string(),
                    self.topic_name(e.target()).to_string(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// The `topic → sorted [prerequisites]` view of the graph.
    ///
    /// Every topic appears as a key, including roots (empty list), so the map
    /// round-trips through [`PrerequisiteGraph::from_prerequisite_map`].
    #[must_use]
    pub fn prerequisite_map(&self) -> BTreeMap<String, Vec<String>> {
        self.graph
            .node_indices()
            .map(|idx| {
                let mut prerequisites: Vec<String> = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .map(|p| self.topic_name(p).to_string())
                    .collect();
                prerequisites.sort_unstable();
                (self.topic_name(idx).to_string(), prerequisites)
            })
            .collect()
    }

    /// BLAKE3 hash of the graph's logical content, prefixed with `blake3:`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let edges: BTreeSet<(String, String)> = self.edges().into_iter().collect();
        let topics: BTreeSet<String> = self.node_map.keys().cloned().collect();
        hash_content(&edges, &topics)
    }

    /// Check the acyclicity invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] with a witness if the graph is cyclic.
    pub fn verify_acyclic(&self) -> GraphResult<()> {
        cycles::stalled_cycle(&self.graph).map_or(Ok(()), |path| Err(GraphError::cycle(path)))
    }

    // -----------------------------------------------------------------------
    // Crate-internal helpers
    // -----------------------------------------------------------------------

    /// Look up the `NodeIndex` for a topic.
    pub(crate) fn node_index(&self, topic: &str) -> Option<NodeIndex> {
        self.node_map.get(topic).copied()
    }

    /// Look up a topic, failing with [`GraphError::UnknownTopic`].
    pub(crate) fn require(&self, topic: &str) -> GraphResult<NodeIndex> {
        self.node_index(topic)
            .ok_or_else(|| GraphError::unknown_topic(topic))
    }

    /// Topic label for a node held by this graph.
    pub(crate) fn topic_name(&self, idx: NodeIndex) -> &str {
        self.graph[idx].as_str()
    }

    fn ensure_node(&mut self, topic: &str) -> NodeIndex {
        if let Some(idx) = self.node_index(topic) {
            return idx;
        }
        let idx = self.graph.add_node(topic.to_string());
        self.node_map.insert(topic.to_string(), idx);
        idx
    }

    /// Batch insertion: validates the pair but defers the cycle check to
    /// [`Self::finish`].
    fn insert_edge_unchecked(&mut self, prerequisite: &str, dependent: &str) -> GraphResult<()> {
        validate_pair(prerequisite, dependent)?;
        let from = self.ensure_node(prerequisite);
        let to = self.ensure_node(dependent);
        // Avoid duplicate edges (petgraph allows them by default).
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge(from, to, ());
        }
        Ok(())
    }

    fn finish(self) -> GraphResult<Self> {
        if let Some(path) = cycles::stalled_cycle(&self.graph) {
            warn!(cycle = ?path, "rejected edge set containing a cycle");
            return Err(GraphError::cycle(path));
        }
        debug!(
            topics = self.topic_count(),
            edges = self.edge_count(),
            "built prerequisite graph"
        );
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_pair(prerequisite: &str, dependent: &str) -> GraphResult<()> {
    if prerequisite.is_empty() || dependent.is_empty() {
        return Err(GraphError::invalid_edge(
            prerequisite,
            dependent,
            InvalidEdgeReason::EmptyTopic,
        ));
    }
    if prerequisite == dependent {
        return Err(GraphError::invalid_edge(
            prerequisite,
            dependent,
            InvalidEdgeReason::SelfLoop,
        ));
    }
    Ok(())
}

/// Compute a BLAKE3 hash of a sorted edge list and topic list.
pub(crate) fn hash_content(
    edges: &BTreeSet<(String, String)>,
    topics: &BTreeSet<String>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    for (prerequisite, dependent) in edges {
        hasher.update(prerequisite.as_bytes());
        hasher.update(b"\x00");
        hasher.update(dependent.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for topic in topics {
        hasher.update(topic.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
