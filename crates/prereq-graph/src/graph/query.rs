//! Learner-facing queries: frontier, reachability, learning paths.
//!
//! # Frontier Semantics
//!
//! A topic is **unlocked** for a learner when it is not yet known and every
//! one of its prerequisites is known. Topics without prerequisites are
//! always unlocked until learned. Adding topics to the known set never
//! revokes an unlock: the check is a pure "all prerequisites ⊆ known" test.
//!
//! Names in the known set that the graph has never seen are skipped under
//! [`UnknownTopicPolicy::Ignore`] and rejected under
//! [`UnknownTopicPolicy::Reject`].

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::config::UnknownTopicPolicy;
use crate::error::{GraphError, GraphResult};
use crate::graph::build::PrerequisiteGraph;

impl PrerequisiteGraph {
    /// Topics immediately learnable given `known`, sorted.
    ///
    /// # Errors
    ///
    /// Only under [`UnknownTopicPolicy::Reject`]: returns
    /// [`GraphError::UnknownTopic`] for the smallest unrecognised name.
    pub fn next_topics<I, S>(&self, known: I) -> GraphResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known = self.resolve_known(known)?;

        let mut unlocked: Vec<String> = self
            .graph
            .node_indices()
            .filter(|idx| !known.contains(idx))
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .all(|p| known.contains(&p))
            })
            .map(|idx| self.topic_name(idx).to_string())
            .collect();
        unlocked.sort_unstable();

        trace!(known = known.len(), unlocked = unlocked.len(), "computed next topics");
        Ok(unlocked)
    }

    /// Topics with no prerequisites, sorted.
    #[must_use]
    pub fn root_topics(&self) -> Vec<String> {
        self.sorted_where(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        })
    }

    /// Topics nothing depends on, sorted.
    #[must_use]
    pub fn leaf_topics(&self) -> Vec<String> {
        self.sorted_where(|idx| {
            self.graph
                .neighbors_directed(idx, Direction::Outgoing)
                .next()
                .is_none()
        })
    }

    /// Every topic `topic` transitively requires, excluding itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTopic`] if `topic` is not in the graph.
    pub fn ancestors(&self, topic: &str) -> GraphResult<BTreeSet<String>> {
        let start = self.require(topic)?;
        Ok(self.names(&self.reachable(start, Direction::Incoming)))
    }

    /// Every topic that transitively requires `topic`, excluding itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTopic`] if `topic` is not in the graph.
    pub fn descendants(&self, topic: &str) -> GraphResult<BTreeSet<String>> {
        let start = self.require(topic)?;
        Ok(self.names(&self.reachable(start, Direction::Outgoing)))
    }

    /// Direct prerequisites of `topic`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTopic`] if `topic` is not in the graph.
    pub fn prerequisites(&self, topic: &str) -> GraphResult<Vec<String>> {
        let idx = self.require(topic)?;
        Ok(self.neighbour_names(idx, Direction::Incoming))
    }

    /// Topics that list `topic` as a direct prerequisite, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTopic`] if `topic` is not in the graph.
    pub fn dependents(&self, topic: &str) -> GraphResult<Vec<String>> {
        let idx = self.require(topic)?;
        Ok(self.neighbour_names(idx, Direction::Outgoing))
    }

    /// Everything needed to learn `target`, in study order, ending with
    /// `target` itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownTopic`] if `target` is not in the graph.
    pub fn learning_path(&self, target: &str) -> GraphResult<Vec<String>> {
        let start = self.require(target)?;
        let mut subset = self.reachable(start, Direction::Incoming);
        subset.insert(start);

        Ok(self
            .ordered_indices(Some(&subset))?
            .into_iter()
            .map(|idx| self.topic_name(idx).to_string())
            .collect())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn resolve_known<I, S>(&self, known: I) -> GraphResult<HashSet<NodeIndex>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolved = HashSet::new();
        let mut unknown: BTreeSet<String> = BTreeSet::new();

        for name in known {
            let name = name.as_ref();
            match self.node_index(name) {
                Some(idx) => {
                    resolved.insert(idx);
                }
                None => {
                    unknown.insert(name.to_string());
                }
            }
        }

        if let Some(first) = unknown.into_iter().next() {
            match self.config.unknown_topics {
                UnknownTopicPolicy::Ignore => {
                    trace!(topic = %first, "ignoring unknown known-topic");
                }
                UnknownTopicPolicy::Reject => return Err(GraphError::unknown_topic(first)),
            }
        }

        Ok(resolved)
    }

    /// BFS over `direction`, excluding `start`.
    fn reachable(&self, start: NodeIndex, direction: Direction) -> HashSet<NodeIndex> {
        let mut seen: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, direction) {
                if next != start && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }

    fn names(&self, nodes: &HashSet<NodeIndex>) -> BTreeSet<String> {
        nodes
            .iter()
            .map(|&idx| self.topic_name(idx).to_string())
            .collect()
    }

    fn neighbour_names(&self, idx: NodeIndex, direction: Direction) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.topic_name(n).to_string())
            .collect();
        names.sort_unstable();
        names
    }

    fn sorted_where(&self, keep: impl Fn(NodeIndex) -> bool) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .node_indices()
            .filter(|&idx| keep(idx))
            .map(|idx| self.topic_name(idx).to_string())
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::config::{GraphConfig, UnknownTopicPolicy};
    use crate::error::GraphError;
    use crate::graph::build::PrerequisiteGraph;

    fn searching_graph() -> PrerequisiteGraph {
        PrerequisiteGraph::from_edges([
            ("Arrays", "Sorting"),
            ("Arrays", "Searching"),
            ("Sorting", "Searching"),
        ])
        .expect("acyclic")
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn next_topics_searching_example() {
        let g = searching_graph();
        assert_eq!(g.next_topics(["Arrays"]).expect("next"), vec!["Sorting"]);
        assert_eq!(
            g.next_topics(["Arrays", "Sorting"]).expect("next"),
            vec!["Searching"]
        );
    }

    #[test]
    fn next_topics_empty_known_is_roots() {
        let mut g = searching_graph();
        g.add_topic("Math").expect("add");
        let next = g.next_topics(Vec::<&str>::new()).expect("next");
        assert_eq!(next, vec!["Arrays", "Math"]);
        assert_eq!(next, g.root_topics());
    }

    #[test]
    fn next_topics_everything_known() {
        let g = searching_graph();
        assert!(
            g.next_topics(["Arrays", "Sorting", "Searching"])
                .expect("next")
                .is_empty()
        );
    }

    #[test]
    fn next_topics_ignores_unknown_names_by_default() {
        let g = searching_graph();
        assert_eq!(
            g.next_topics(["Arrays", "Quantum Physics"]).expect("next"),
            vec!["Sorting"]
        );
    }

    #[test]
    fn next_topics_rejects_unknown_names_when_strict() {
        let mut g = searching_graph();
        g.set_config(GraphConfig {
            unknown_topics: UnknownTopicPolicy::Reject,
        });

        let err = g
            .next_topics(["Zebra", "Arrays", "Alpha"])
            .expect_err("strict");
        assert_eq!(err, GraphError::unknown_topic("Alpha"));
    }

    #[test]
    fn next_topics_known_topic_with_missing_prereqs_is_not_listed() {
        // Searching is "known" out of order; it is never offered again.
        let g = searching_graph();
        assert_eq!(
            g.next_topics(["Searching"]).expect("next"),
            vec!["Arrays"]
        );
    }

    #[test]
    fn ancestors_and_descendants() {
        let g = searching_graph();
        assert_eq!(g.ancestors("Searching").expect("anc"), set(&["Arrays", "Sorting"]));
        assert_eq!(g.ancestors("Arrays").expect("anc"), set(&[]));
        assert_eq!(
            g.descendants("Arrays").expect("desc"),
            set(&["Searching", "Sorting"])
        );
        assert_eq!(g.descendants("Searching").expect("desc"), set(&[]));
    }

    #[test]
    fn reachability_unknown_topic() {
        let g = searching_graph();
        assert_eq!(
            g.ancestors("Graphs").expect_err("unknown"),
            GraphError::unknown_topic("Graphs")
        );
        assert!(g.descendants("Graphs").is_err());
        assert!(g.prerequisites("Graphs").is_err());
        assert!(g.dependents("Graphs").is_err());
        assert!(g.learning_path("Graphs").is_err());
    }

    #[test]
    fn direct_neighbours_sorted() {
        let g = searching_graph();
        assert_eq!(
            g.prerequisites("Searching").expect("pre"),
            vec!["Arrays", "Sorting"]
        );
        assert_eq!(
            g.dependents("Arrays").expect("dep"),
            vec!["Searching", "Sorting"]
        );
    }

    #[test]
    fn roots_and_leaves() {
        let g = searching_graph();
        assert_eq!(g.root_topics(), vec!["Arrays"]);
        assert_eq!(g.leaf_topics(), vec!["Searching"]);
    }

    #[test]
    fn learning_path_orders_only_required_topics() {
        let g = PrerequisiteGraph::from_edges([
            ("Arrays", "LinkedLists"),
            ("LinkedLists", "Stacks"),
            ("Stacks", "Recursion"),
            ("Recursion", "Trees"),
            ("Arrays", "Sorting"),
            ("Math", "NumberTheory"),
        ])
        .expect("acyclic");

        assert_eq!(
            g.learning_path("Trees").expect("path"),
            vec!["Arrays", "LinkedLists", "Stacks", "Recursion", "Trees"]
        );
        assert_eq!(g.learning_path("Arrays").expect("path"), vec!["Arrays"]);
    }

    #[test]
    fn queries_do_not_mutate() {
        let g = searching_graph();
        let before = g.content_hash();
        let first = g.next_topics(["Arrays"]).expect("next");
        let second = g.next_topics(["Arrays"]).expect("next");
        assert_eq!(first, second);
        assert_eq!(g.content_hash(), before);
    }
}
