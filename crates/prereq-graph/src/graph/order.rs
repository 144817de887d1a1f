//! Orderings over the prerequisite graph.
//!
//! # Topological Order
//!
//! Kahn elimination with a min-heap of ready topics: whenever several topics
//! have all prerequisites placed, the lexicographically smallest goes first.
//! The output is therefore fully determined by the edge set, which keeps
//! diffs against hand-authored curricula stable.
//!
//! # Layers
//!
//! Layer assignment is a forward pass in topological order, the same shape as
//! the earliest-start pass of a critical path computation:
//!
//! ```text
//! level(t) = 0                                   if t has no prerequisites
//! level(t) = 1 + max(level(p) for p in prereqs)  otherwise
//! ```
//!
//! This is the *longest* path from any root, so a topic that needs a deep
//! chain lands deep even when it also has a shallow prerequisite.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::graph::build::PrerequisiteGraph;
use crate::graph::cycles;

/// One layer of the layered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer index; 0 holds the topics without prerequisites.
    pub level: usize,
    /// Topics assigned to this layer.
    pub topics: BTreeSet<String>,
}

impl PrerequisiteGraph {
    /// All topics in dependency order, ties broken lexicographically.
    ///
    /// For every edge `p → d`, `p` appears strictly before `d`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] if the graph is not acyclic.
    pub fn topological_order(&self) -> GraphResult<Vec<String>> {
        let order = self.ordered_indices(None)?;
        Ok(order
            .into_iter()
            .map(|idx| self.topic_name(idx).to_string())
            .collect())
    }

    /// Topics grouped by longest-path depth, shallowest layer first.
    ///
    /// Layers are contiguous from 0 and never empty.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] if the graph is not acyclic.
    pub fn layered_levels(&self) -> GraphResult<Vec<Layer>> {
        let levels = self.level_indices()?;

        let mut layers: BTreeMap<usize, BTreeSet<String>> = BTreeMap::new();
        for (idx, level) in levels {
            layers
                .entry(level)
                .or_default()
                .insert(self.topic_name(idx).to_string());
        }

        Ok(layers
            .into_iter()
            .map(|(level, topics)| Layer { level, topics })
            .collect())
    }

    /// Longest-path depth of every topic, keyed by topic.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Cycle`] if the graph is not acyclic.
    pub fn topic_levels(&self) -> GraphResult<BTreeMap<String, usize>> {
        Ok(self
            .level_indices()?
            .into_iter()
            .map(|(idx, level)| (self.topic_name(idx).to_string(), level))
            .collect())
    }

    /// Kahn elimination with lexicographic tie-break.
    ///
    /// With `subset`, only those topics are ordered and edges leaving the
    /// subset are ignored.
    pub(crate) fn ordered_indices(
        &self,
        subset: Option<&HashSet<NodeIndex>>,
    ) -> GraphResult<Vec<NodeIndex>> {
        let included = |idx: &NodeIndex| subset.is_none_or(|s| s.contains(idx));

        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .filter(|idx| included(idx))
            .map(|idx| {
                let deg = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .filter(|p| included(p))
                    .count();
                (idx, deg)
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<(&str, NodeIndex)>> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&idx, _)| Reverse((self.topic_name(idx), idx)))
            .collect();

        let mut order: Vec<NodeIndex> = Vec::with_capacity(in_degree.len());

        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(idx);
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&next) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(Reverse((self.topic_name(next), next)));
                    }
                }
            }
        }

        if order.len() < in_degree.len() {
            let path = cycles::stalled_cycle(&self.graph).unwrap_or_default();
            return Err(GraphError::cycle(path));
        }

        Ok(order)
    }

    fn level_indices(&self) -> GraphResult<Vec<(NodeIndex, usize)>> {
        let order = self.ordered_indices(None)?;

        let mut level: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        for &v in &order {
            let depth = self
                .graph
                .neighbors_directed(v, Direction::Incoming)
                .map(|p| level.get(&p).copied().unwrap_or(0) + 1)
                .max()
                .unwrap_or(0);
            level.insert(v, depth);
        }

        Ok(order.into_iter().map(|v| (v, level[&v])).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::build::PrerequisiteGraph;

    fn graph(edges: &[(&str, &str)]) -> PrerequisiteGraph {
        PrerequisiteGraph::from_edges(edges.iter().copied()).expect("acyclic")
    }

    fn position(order: &[String], topic: &str) -> usize {
        order
            .iter()
            .position(|t| t == topic)
            .unwrap_or_else(|| panic!("{topic} present"))
    }

    #[test]
    fn topological_order_empty() {
        let g = PrerequisiteGraph::new();
        assert_eq!(g.topological_order().expect("order"), Vec::<String>::new());
        assert!(g.layered_levels().expect("levels").is_empty());
    }

    #[test]
    fn topological_order_single_topic() {
        let mut g = PrerequisiteGraph::new();
        g.add_topic("Arrays").expect("add");
        assert_eq!(g.topological_order().expect("order"), vec!["Arrays"]);
    }

    #[test]
    fn topological_order_searching_example() {
        let g = graph(&[
            ("Arrays", "Sorting"),
            ("Arrays", "Searching"),
            ("Sorting", "Searching"),
        ]);
        assert_eq!(
            g.topological_order().expect("order"),
            vec!["Arrays", "Sorting", "Searching"]
        );
    }

    #[test]
    fn topological_order_lexicographic_ties() {
        // Two independent roots and a diamond: ready sets are always sorted.
        let g = graph(&[("Z", "M"), ("A", "M"), ("A", "C"), ("A", "B"), ("B", "D"), ("C", "D")]);
        assert_eq!(
            g.topological_order().expect("order"),
            vec!["A", "B", "C", "D", "Z", "M"]
        );
    }

    #[test]
    fn topological_order_respects_every_edge() {
        let edges = [("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")];
        let g = graph(&edges);
        let order = g.topological_order().expect("order");

        assert_eq!(order.len(), 5);
        for (p, d) in edges {
            assert!(position(&order, p) < position(&order, d), "{p} before {d}");
        }
    }

    #[test]
    fn layered_levels_longest_path() {
        let g = graph(&[("A", "B"), ("B", "C"), ("A", "C")]);
        let levels = g.topic_levels().expect("levels");
        assert_eq!(levels["A"], 0);
        assert_eq!(levels["B"], 1);
        assert_eq!(levels["C"], 2);
    }

    #[test]
    fn layered_levels_groups_topics() {
        let g = graph(&[
            ("Arrays", "Sorting"),
            ("Arrays", "LinkedLists"),
            ("LinkedLists", "Stacks"),
            ("Sorting", "Greedy"),
            ("Math", "NumberTheory"),
        ]);
        let layers = g.layered_levels().expect("levels");

        let as_vecs: Vec<(usize, Vec<&str>)> = layers
            .iter()
            .map(|l| (l.level, l.topics.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            as_vecs,
            vec![
                (0, vec!["Arrays", "Math"]),
                (1, vec!["LinkedLists", "NumberTheory", "Sorting"]),
                (2, vec!["Greedy", "Stacks"]),
            ]
        );
    }

    #[test]
    fn isolated_topic_is_level_zero() {
        let mut g = graph(&[("A", "B")]);
        g.add_topic("Lonely").expect("add");
        let layers = g.layered_levels().expect("levels");
        assert!(layers[0].topics.contains("Lonely"));
    }

    #[test]
    fn layer_serializes_as_plain_record() {
        let g = graph(&[("A", "B")]);
        let json = serde_json::to_value(g.layered_levels().expect("levels")).expect("json");
        assert_eq!(
            json,
            serde_json::json!([
                {"level": 0, "topics": ["A"]},
                {"level": 1, "topics": ["B"]},
            ])
        );
    }
}
