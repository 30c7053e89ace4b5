//! Depsight Domain Layer
//!
//! This crate contains the data model for dependency discovery. It defines the
//! value types every pipeline stage exchanges and the trait seams that
//! strategies plug into. It carries no pipeline logic of its own.
//!
//! ## Key Concepts
//!
//! - **Claim**: a single, source-attributed observation asserting that one
//!   application talks to another
//! - **Confidence Score**: a bounded `[0.0, 1.0]` measure of trust
//! - **Source Type**: where a claim came from, used to weight trust
//! - **Relationship Key**: the canonical `source -> target` identity that groups
//!   claims describing the same relationship
//! - **Dependency**: an accepted, typed, confidence-scored relationship
//!
//! ## Architecture
//!
//! - Value types only, constructed through validating factory functions
//! - Claims are never mutated; each stage derives a new claim
//! - Trait definitions for the pluggable scoring and inference strategies

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod confidence;
pub mod dependency;
pub mod error;
pub mod relationship;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use claim::{current_timestamp_millis, Claim, ClaimId};
pub use confidence::ConfidenceScore;
pub use dependency::{Dependency, DependencyType};
pub use error::DomainError;
pub use relationship::RelationshipKey;
pub use source::SourceType;
pub use traits::{InferenceHook, ScoringRuleEngine};
