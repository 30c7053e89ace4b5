//! Error types for the pipeline

use thiserror::Error;

/// Errors that can occur while configuring the pipeline
///
/// Per-claim problems never surface here; they are collected in the batch
/// reports returned by each stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration TOML could not be parsed
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
