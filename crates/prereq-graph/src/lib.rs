#![forbid(unsafe_code)]
//! prereq-graph library.
//!
//! Validates topic prerequisite relationships as a directed acyclic graph and
//! derives study orderings and next-topic recommendations from it.
//!
//! # Conventions
//!
//! - **Errors**: typed [`GraphError`] for every graph operation; config
//!   loading uses `anyhow::Result`.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`, `trace!`). The library
//!   never installs a subscriber.

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod shared;

pub use cache::GraphCache;
pub use config::{GraphConfig, UnknownTopicPolicy, load_graph_config};
pub use error::{ErrorCode, GraphError, GraphResult, InvalidEdgeReason};
pub use graph::{GraphStats, Layer, PrerequisiteGraph, find_all_cycles};
pub use shared::SharedGraph;
