//! Graph error types

use thiserror::Error;

/// Errors raised by graph operations with structural preconditions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A topological order was requested for a graph with cycles
    #[error("Graph contains {cycle_count} cycle(s); topological order is undefined")]
    CycleDetected {
        /// Number of cycles found by cycle detection
        cycle_count: usize,
    },
}
