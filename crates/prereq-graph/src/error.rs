//! Error taxonomy for graph construction and queries.
//!
//! Every failure is caller-data related and synchronous: an edge that can
//! never be valid, a set of edges that closes a cycle, or a query naming a
//! topic the graph has never seen. None of them are retryable.

use std::fmt;

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Why an edge was rejected before it reached the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidEdgeReason {
    /// Prerequisite and dependent are the same topic.
    SelfLoop,
    /// One of the endpoints is the empty string.
    EmptyTopic,
}

impl fmt::Display for InvalidEdgeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => f.write_str("a topic cannot be its own prerequisite"),
            Self::EmptyTopic => f.write_str("topic identifiers must be non-empty"),
        }
    }
}

/// Errors produced by [`crate::PrerequisiteGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The edge can never be part of a valid graph.
    #[error("invalid edge '{prerequisite}' -> '{dependent}': {reason}")]
    InvalidEdge {
        /// Prerequisite side of the offending pair.
        prerequisite: String,
        /// Dependent side of the offending pair.
        dependent: String,
        /// What is wrong with the pair.
        reason: InvalidEdgeReason,
    },

    /// The dependency relation contains a directed cycle.
    ///
    /// `path` starts and ends with the same topic, e.g.
    /// `[Arrays, Sorting, Searching, Arrays]`.
    #[error("dependency cycle: {}", path.join(" -> "))]
    Cycle {
        /// Ordered cycle witness.
        path: Vec<String>,
    },

    /// A query referenced a topic absent from the graph.
    #[error("unknown topic: {topic}")]
    UnknownTopic {
        /// The topic that was not found.
        topic: String,
    },
}

impl GraphError {
    /// Creates an invalid edge error for the given pair.
    pub fn invalid_edge(
        prerequisite: impl Into<String>,
        dependent: impl Into<String>,
        reason: InvalidEdgeReason,
    ) -> Self {
        Self::InvalidEdge {
            prerequisite: prerequisite.into(),
            dependent: dependent.into(),
            reason,
        }
    }

    /// Creates a cycle error carrying the witness path.
    #[must_use]
    pub const fn cycle(path: Vec<String>) -> Self {
        Self::Cycle { path }
    }

    /// Creates an unknown topic error.
    pub fn unknown_topic(topic: impl Into<String>) -> Self {
        Self::UnknownTopic {
            topic: topic.into(),
        }
    }

    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidEdge { .. } => ErrorCode::InvalidEdge,
            Self::Cycle { .. } => ErrorCode::CycleDetected,
            Self::UnknownTopic { .. } => ErrorCode::TopicNotFound,
        }
    }

    /// The cycle witness, if this is a cycle error.
    #[must_use]
    pub fn cycle_path(&self) -> Option<&[String]> {
        match self {
            Self::Cycle { path } => Some(path),
            _ => None,
        }
    }
}

/// Machine-readable error codes for tooling that reacts to engine failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    TopicNotFound,
    CycleDetected,
    InvalidEdge,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TopicNotFound => "E2001",
            Self::CycleDetected => "E2003",
            Self::InvalidEdge => "E2005",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::TopicNotFound => "Topic not found",
            Self::CycleDetected => "Dependency cycle detected",
            Self::InvalidEdge => "Invalid prerequisite edge",
        }
    }

    /// Remediation hint that can be surfaced to curators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::TopicNotFound => None,
            Self::CycleDetected => {
                Some("Remove one prerequisite link on the reported path to keep the graph acyclic.")
            }
            Self::InvalidEdge => Some("Drop self-referencing or blank prerequisite entries."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
