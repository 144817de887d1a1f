use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine policy, usually read from a `prereq.toml` owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// How `next_topics` treats known-topic names the graph has never seen.
    #[serde(default)]
    pub unknown_topics: UnknownTopicPolicy,
}

/// Handling of unrecognised names in a learner's known-topic set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTopicPolicy {
    /// Skip names that are not graph topics.
    #[default]
    Ignore,
    /// Fail with `UnknownTopic` on the first such name.
    Reject,
}

impl GraphConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML or has unexpected
    /// values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content).context("Failed to parse graph config")
    }
}

/// Load the config at `path`, falling back to defaults when the file does
/// not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_graph_config(path: &Path) -> Result<GraphConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no graph config, using defaults");
        return Ok(GraphConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<GraphConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_lenient() {
        assert_eq!(
            GraphConfig::default().unknown_topics,
            UnknownTopicPolicy::Ignore
        );
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = GraphConfig::from_toml_str("").expect("parse");
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn parses_reject_policy() {
        let config = GraphConfig::from_toml_str("unknown_topics = \"reject\"\n").expect("parse");
        assert_eq!(config.unknown_topics, UnknownTopicPolicy::Reject);
    }

    #[test]
    fn rejects_unknown_policy_value() {
        assert!(GraphConfig::from_toml_str("unknown_topics = \"maybe\"\n").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_graph_config(&dir.path().join("prereq.toml")).expect("load");
        assert_eq!(config, GraphConfig::default());
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prereq.toml");
        std::fs::write(&path, "unknown_topics = \"reject\"\n").expect("write");

        let config = load_graph_config(&path).expect("load");
        assert_eq!(config.unknown_topics, UnknownTopicPolicy::Reject);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prereq.toml");
        std::fs::write(&path, "unknown_topics = [").expect("write");

        let err = load_graph_config(&path).expect_err("should fail");
        assert!(format!("{err}").contains("prereq.toml"));
    }
}
