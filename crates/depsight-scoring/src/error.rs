//! Scoring error types

use thiserror::Error;

/// Errors that can occur while loading, validating or persisting scoring rules
#[derive(Error, Debug)]
pub enum ScoringError {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rule file is not valid TOML for a rule set
    #[error("Failed to parse rule set TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Rule set could not be serialized
    #[error("Failed to serialize rule set: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Rule file was written by an incompatible version
    #[error("Unsupported rule set version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build understands
        supported: u32,
    },

    /// A rule or the rule set itself is invalid
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// Atomic rename of the temp file failed
    #[error("Failed to persist rule set: {0}")]
    Persist(String),
}
