//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline configuration error
    #[error(transparent)]
    Pipeline(#[from] depsight_pipeline::PipelineError),

    /// Scoring rule error
    #[error(transparent)]
    Scoring(#[from] depsight_scoring::ScoringError),

    /// Graph precondition error
    #[error(transparent)]
    Graph(#[from] depsight_graph::GraphError),

    /// Malformed claim record
    #[error("Invalid claim: {0}")]
    Domain(#[from] depsight_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
