//! Error types for the fallible surfaces of the decision core.
//!
//! Deciding never fails. Only loading configuration, parsing policy tables
//! and reading or writing JSONL can.

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("unknown planner mode: {0:?}")]
    UnknownPlanner(String),
    #[error("unknown policy mode: {0:?}")]
    UnknownPolicy(String),
    /// A `Faction=Planner` entry that could not be parsed
    #[error("malformed policy table entry: {0:?}")]
    MalformedPolicyEntry(String),
    #[error("duplicate goal name: {0}")]
    DuplicateGoal(String),
    #[error("custom goal library selected but no goals defined")]
    EmptyCustomLibrary,
}

/// Errors from brain-level operations that touch the outside world.
#[derive(Debug, Error)]
pub enum BrainError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_into_brain_error() {
        let err: BrainError = ConfigError::UnknownPlanner("astar".to_string()).into();
        assert!(matches!(err, BrainError::Config(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: unknown planner mode: \"astar\""
        );
    }
}
