//! Cycle detection for prerequisite graphs.
//!
//! # Edge Direction
//!
//! Edges run `prerequisite → dependent`. Adding a new edge `from → to` would
//! create a cycle if `from` is already reachable from `to`.
//!
//! # Witness
//!
//! Full-graph checks use Kahn elimination. When elimination stalls, every
//! remaining topic sits on or downstream of a cycle. Peeling the remainder
//! from the other side (topics with no remaining successor) leaves only
//! topics that are on a cycle or between two cycles. From the
//! lexicographically smallest of those, the witness walk follows the
//! earliest-inserted remaining outgoing edge until a topic repeats.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Check whether adding `from -> to` would introduce a dependency cycle.
///
/// Returns the shortest cycle path when a cycle would be created, formatted
/// as `from -> to -> ... -> from`.
///
/// If the edge already exists, this returns `None` (no *new* cycle is
/// created).
#[must_use]
pub fn would_create_cycle(
    graph: &DiGraph<String, ()>,
    from: NodeIndex,
    to: NodeIndex,
) -> Option<Vec<String>> {
    if from == to {
        let id = node_id(graph, from);
        return Some(vec![id.clone(), id]);
    }

    if graph.contains_edge(from, to) {
        return None;
    }

    // BFS from `to` looking for `from`.
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([to]);
    let mut visited: HashSet<NodeIndex> = HashSet::from([to]);
    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == from {
            return Some(reconstruct_cycle_path(graph, from, to, &parent));
        }

        for next in graph.neighbors_directed(current, Direction::Outgoing) {
            if visited.insert(next) {
                parent.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

/// Run Kahn elimination over `graph` and return a cycle witness if it
/// stalls.
///
/// Returns `None` when the graph is acyclic. The witness starts and ends with
/// the same topic.
#[must_use]
pub fn stalled_cycle(graph: &DiGraph<String, ()>) -> Option<Vec<String>> {
    let mut in_degree: HashMap<NodeIndex, usize> = graph
        .node_indices()
        .map(|idx| {
            (
                idx,
                graph.neighbors_directed(idx, Direction::Incoming).count(),
            )
        })
        .collect();

    let mut queue: VecDeque<NodeIndex> = in_degree
        .iter()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(&idx, _)| idx)
        .collect();
    let mut remaining: HashSet<NodeIndex> = graph.node_indices().collect();

    while let Some(node) = queue.pop_front() {
        remaining.remove(&node);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if let Some(deg) = in_degree.get_mut(&next) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    if remaining.is_empty() {
        return None;
    }

    let core = peel_sinks(graph, remaining);
    Some(cycle_witness(graph, &core))
}

/// Find all cycles in a raw, unvalidated edge list.
///
/// Each entry is a sorted list of topics in one strongly connected component
/// that forms a cycle. Self-loops are reported as a one-element cycle.
/// Duplicate pairs are ignored. Useful for showing a curator every problem in
/// a rejected batch at once.
#[must_use]
pub fn find_all_cycles<I, P, D>(edges: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = (P, D)>,
    P: AsRef<str>,
    D: AsRef<str>,
{
    let mut graph = DiGraph::<String, ()>::new();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

    for (from, to) in edges {
        let (from, to) = (from.as_ref(), to.as_ref());
        let from_idx = *node_map
            .entry(from.to_string())
            .or_insert_with(|| graph.add_node(from.to_string()));
        let to_idx = *node_map
            .entry(to.to_string())
            .or_insert_with(|| graph.add_node(to.to_string()));
        if !graph.contains_edge(from_idx, to_idx) {
            graph.add_edge(from_idx, to_idx, ());
        }
    }

    let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| graph.find_edge(*node, *node).is_some())
        })
        .map(|component| {
            let mut ids: Vec<String> = component
                .into_iter()
                .map(|idx| node_id(&graph, idx))
                .collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Drop nodes with no successor inside `remaining`, repeatedly.
fn peel_sinks(
    graph: &DiGraph<String, ()>,
    mut remaining: HashSet<NodeIndex>,
) -> HashSet<NodeIndex> {
    let mut out_degree: HashMap<NodeIndex, usize> = remaining
        .iter()
        .map(|&idx| {
            let deg = graph
                .neighbors_directed(idx, Direction::Outgoing)
                .filter(|n| remaining.contains(n))
                .count();
            (idx, deg)
        })
        .collect();

    let mut queue: VecDeque<NodeIndex> = out_degree
        .iter()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(&idx, _)| idx)
        .collect();

    while let Some(node) = queue.pop_front() {
        remaining.remove(&node);
        for prev in graph.neighbors_directed(node, Direction::Incoming) {
            if let Some(deg) = out_degree.get_mut(&prev).filter(|deg| **deg > 0) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(prev);
                }
            }
        }
    }

    remaining
}

/// Walk the core from its smallest topic along earliest-inserted edges until
/// a topic repeats.
fn cycle_witness(graph: &DiGraph<String, ()>, core: &HashSet<NodeIndex>) -> Vec<String> {
    let Some(mut current) = core.iter().copied().min_by_key(|&idx| node_id(graph, idx)) else {
        return Vec::new();
    };

    let mut walk: Vec<NodeIndex> = Vec::new();
    let mut position: HashMap<NodeIndex, usize> = HashMap::new();

    loop {
        if let Some(&start) = position.get(&current) {
            let mut path: Vec<String> = walk[start..]
                .iter()
                .map(|&idx| node_id(graph, idx))
                .collect();
            path.push(node_id(graph, current));
            return path;
        }
        position.insert(current, walk.len());
        walk.push(current);

        let next = graph
            .edges_directed(current, Direction::Outgoing)
            .filter(|e| core.contains(&e.target()))
            .min_by_key(|e| e.id())
            .map(|e| e.target());

        // Every core node keeps a core successor; fall back to listing the
        // core if that ever fails to hold.
        let Some(next) = next else {
            let mut members: Vec<String> = core.iter().map(|&idx| node_id(graph, idx)).collect();
            members.sort_unstable();
            return members;
        };
        current = next;
    }
}

fn reconstruct_cycle_path(
    graph: &DiGraph<String, ()>,
    from: NodeIndex,
    to: NodeIndex,
    parent: &HashMap<NodeIndex, NodeIndex>,
) -> Vec<String> {
    // Parent links represent a path: to -> ... -> from.
    let mut to_to_from: Vec<NodeIndex> = vec![from];
    let mut cursor = from;

    while cursor != to {
        if let Some(next) = parent.get(&cursor) {
            cursor = *next;
            to_to_from.push(cursor);
        } else {
            break;
        }
    }

    to_to_from.reverse();

    let mut cycle: Vec<String> = Vec::with_capacity(to_to_from.len() + 1);
    cycle.push(node_id(graph, from));
    cycle.extend(to_to_from.into_iter().map(|idx| node_id(graph, idx)));
    cycle
}

fn node_id(graph: &DiGraph<String, ()>, idx: NodeIndex) -> String {
    graph
        .node_weight(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx.index()))
}
