//! Depsight Pipeline
//!
//! Turns normalized observations ("claims") into accepted, typed and
//! confidence-scored dependencies.
//!
//! # Architecture
//!
//! ```text
//! claims → ClaimProcessingEngine → ConflictResolutionEngine → InferenceEngine → DependencyGraphBuilder
//!           normalize/validate/score   weighted vote per key     classify + blend     graph + statistics
//! ```
//!
//! # Key Features
//!
//! - **Fault isolation**: a claim that fails validation is dropped on its own
//!   and recorded in the [`BatchReport`]; the batch carries on
//! - **Pluggable scoring**: any [`depsight_domain::ScoringRuleEngine`] can be injected
//! - **Weighted conflict resolution**: one claim per relationship survives,
//!   with every contender's weight kept in the [`ResolutionReport`]
//! - **Multi-factor inference**: type classification plus a seven-factor
//!   confidence blend, low-confidence cutoff and deduplication
//! - **Tunable**: every threshold lives in [`PipelineConfig`]
//!
//! # Example Usage
//!
//! ```
//! use depsight_domain::{Claim, ConfidenceScore, SourceType};
//! use depsight_pipeline::{DependencyPipeline, PipelineConfig};
//! use depsight_scoring::SourceTableScorer;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let now = 1_700_000_000_000;
//! let claims = vec![
//!     Claim::new("r-1", SourceType::RouterLog, "GET /api/users 200", "web-app -> user-service", now)?
//!         .with_confidence(ConfidenceScore::new(0.7)?),
//!     Claim::new("g-1", SourceType::ApiGateway, "GET /api/users/7", "web-app -> user-service", now)?
//!         .with_confidence(ConfidenceScore::new(0.9)?),
//! ];
//!
//! let pipeline = DependencyPipeline::new(SourceTableScorer::new(), PipelineConfig::default())?;
//! let output = pipeline.run_at(&claims, now);
//!
//! assert_eq!(output.dependencies.len(), 1);
//! assert_eq!(output.resolution.report.conflicts.len(), 1);
//! println!("{}", output.processing.report.summary());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod inference;
mod pipeline;
mod processing;
mod report;
mod resolution;

pub use config::{default_source_priority, PipelineConfig, DEFAULT_CLAIM_CONFIDENCE};
pub use error::PipelineError;
pub use inference::{
    classify, is_high_reliability, recency_factor, source_reliability, type_specificity,
    ConfidenceFactors, CrossDependencyPatterns, InferenceEngine, InferenceOutcome,
    TemporalCorrelation, DEFAULT_MIN_DEPENDENCY_CONFIDENCE, SATURATION_COUNT,
};
pub use pipeline::{DependencyPipeline, PipelineOutput};
pub use processing::{ClaimProcessingEngine, ProcessingOutcome};
pub use report::{
    BatchReport, ClaimFailure, ClampedScore, ConflictRecord, Contender, InferenceReport,
    ProcessingStage, ResolutionReport, SkippedKey,
};
pub use resolution::{
    frequency_weight, ConflictResolutionEngine, ResolutionOutcome,
    DEFAULT_MIN_RESOLVED_CONFIDENCE, DEFAULT_RECENCY_DECAY_BASE, DEFAULT_RECENCY_FLOOR,
    DEFAULT_RECENCY_WINDOW_HOURS, FREQUENT_FREQUENCY_WEIGHT, REPEATED_FREQUENCY_WEIGHT,
    UNKNOWN_SOURCE_PRIORITY,
};
