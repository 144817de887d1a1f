//! Prerequisite graph module.
//!
//! # Overview
//!
//! This module owns a petgraph-based directed graph of topics and answers
//! ordering and frontier queries over it.
//!
//! ## Pipeline
//!
//! ```text
//! (prerequisite, dependent) pairs   or   topic → [prerequisites] table
//!        ↓  build::PrerequisiteGraph::from_edges() / from_prerequisite_map()
//!        ↓  cycles::stalled_cycle()  — rejects the batch on a cycle
//! PrerequisiteGraph (acyclic, deduplicated)
//!   ├─ order:  topological_order(), layered_levels()
//!   ├─ query:  next_topics(), ancestors(), descendants(), learning_path()
//!   └─ stats:  GraphStats
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use prereq_graph::PrerequisiteGraph;
//!
//! let graph = PrerequisiteGraph::from_edges([
//!     ("Arrays", "Sorting"),
//!     ("Arrays", "Searching"),
//!     ("Sorting", "Searching"),
//! ])?;
//!
//! assert_eq!(graph.topological_order()?, ["Arrays", "Sorting", "Searching"]);
//! assert_eq!(graph.next_topics(["Arrays"])?, ["Sorting"]);
//! # Ok::<(), prereq_graph::GraphError>(())
//! ```

pub mod build;
pub mod cycles;
pub mod order;
pub mod query;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::PrerequisiteGraph;
pub use cycles::{find_all_cycles, stalled_cycle, would_create_cycle};
pub use order::Layer;
pub use stats::GraphStats;
