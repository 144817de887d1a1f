//! Summary statistics for a prerequisite graph.
//!
//! # Statistics Provided
//!
//! - **`topic_count`** / **`edge_count`**: graph size.
//! - **`root_count`**: topics with no prerequisites (entry points).
//! - **`leaf_count`**: topics nothing depends on.
//! - **`isolated_count`**: topics with no edges at all.
//! - **`depth`**: number of layers in the longest-path layering; 0 for an
//!   empty graph.
//! - **`component_count`**: weakly connected components. A value greater
//!   than 1 means the curriculum splits into independent tracks.
//! - **`max_in_degree`** / **`max_out_degree`**: the topic with the most
//!   direct prerequisites / most direct dependents.

use petgraph::Direction;
use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};

use crate::error::GraphResult;
use crate::graph::build::PrerequisiteGraph;

/// Summary statistics for a [`PrerequisiteGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub topic_count: usize,
    pub edge_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub isolated_count: usize,
    pub depth: usize,
    pub component_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::Cycle`] if the graph is not acyclic, since
    /// `depth` is undefined then.
    pub fn from_graph(graph: &PrerequisiteGraph) -> GraphResult<Self> {
        let g = &graph.graph;

        let in_degree = |idx| g.neighbors_directed(idx, Direction::Incoming).count();
        let out_degree = |idx| g.neighbors_directed(idx, Direction::Outgoing).count();

        let root_count = g.node_indices().filter(|&idx| in_degree(idx) == 0).count();
        let leaf_count = g.node_indices().filter(|&idx| out_degree(idx) == 0).count();
        let isolated_count = g
            .node_indices()
            .filter(|&idx| in_degree(idx) == 0 && out_degree(idx) == 0)
            .count();
        let max_in_degree = g.node_indices().map(in_degree).max().unwrap_or(0);
        let max_out_degree = g.node_indices().map(out_degree).max().unwrap_or(0);

        let depth = graph.layered_levels()?.len();

        Ok(Self {
            topic_count: g.node_count(),
            edge_count: g.edge_count(),
            root_count,
            leaf_count,
            isolated_count,
            depth,
            component_count: connected_components(g),
            max_in_degree,
            max_out_degree,
        })
    }
}

impl PrerequisiteGraph {
    /// Summary statistics for this graph.
    ///
    /// # Errors
    ///
    /// Same as [`GraphStats::from_graph`].
    pub fn stats(&self) -> GraphResult<GraphStats> {
        GraphStats::from_graph(self)
    }
}
