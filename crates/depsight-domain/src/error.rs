//! Domain error types

use thiserror::Error;

/// Errors raised when constructing or validating domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Confidence value outside `[0.0, 1.0]`
    #[error("Confidence {0} is outside [0.0, 1.0]")]
    ConfidenceOutOfRange(f64),

    /// A required field is blank
    #[error("Field '{0}' must not be blank")]
    BlankField(&'static str),

    /// Claim timestamp lies after the reference time
    #[error("Timestamp {timestamp} is in the future (now: {now})")]
    FutureTimestamp {
        /// Claim timestamp (ms since epoch)
        timestamp: u64,
        /// Reference time used for the check (ms since epoch)
        now: u64,
    },

    /// Relationship key does not follow `source -> target`
    #[error("Malformed relationship key: '{0}'")]
    MalformedKey(String),
}
