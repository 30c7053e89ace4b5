//! Outcome records returned by each stage
//!
//! Everything a stage logs about dropped or adjusted input is also recorded
//! here, so callers can act on it without scraping log output.

use depsight_domain::{ClaimId, Dependency, SourceType};
use serde::Serialize;
use std::fmt;

/// Stage of claim processing at which a claim was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStage {
    /// Canonicalisation of the raw claim
    Normalize,
    /// Required-field and timestamp checks
    Validate,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStage::Normalize => write!(f, "normalize"),
            ProcessingStage::Validate => write!(f, "validate"),
        }
    }
}

/// A claim excluded from the batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimFailure {
    /// Id of the excluded claim
    pub claim_id: ClaimId,
    /// Where it failed
    pub stage: ProcessingStage,
    /// Human-readable cause
    pub reason: String,
}

/// A scorer result that had to be forced into `[0.0, 1.0]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClampedScore {
    /// Id of the scored claim
    pub claim_id: ClaimId,
    /// Value returned by the scorer
    pub raw: f64,
    /// Value attached to the claim
    pub clamped: f64,
}

/// Outcome of one processing batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Claims that made it through all stages
    pub success_count: usize,

    /// Claims excluded from the output
    pub failure_count: usize,

    /// One entry per excluded claim, in input order
    pub errors: Vec<ClaimFailure>,

    /// One entry per out-of-range score
    pub clamped: Vec<ClampedScore>,
}

impl BatchReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim that passed every stage
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    /// Record an excluded claim
    pub fn record_failure(&mut self, claim_id: ClaimId, stage: ProcessingStage, reason: String) {
        self.failure_count += 1;
        self.errors.push(ClaimFailure {
            claim_id,
            stage,
            reason,
        });
    }

    /// Record a clamped score
    pub fn record_clamp(&mut self, claim_id: ClaimId, raw: f64, clamped: f64) {
        self.clamped.push(ClampedScore {
            claim_id,
            raw,
            clamped,
        });
    }

    /// Claims seen in the batch
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Whether every claim made it through
    pub fn is_clean(&self) -> bool {
        self.failure_count == 0
    }

    /// Multi-line human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Claim Processing Summary".to_string(),
            "========================".to_string(),
            format!("Processed: {}", self.success_count),
            format!("Excluded: {}", self.failure_count),
            format!("Clamped scores: {}", self.clamped.len()),
        ];

        if !self.errors.is_empty() {
            lines.push(String::new());
            lines.push("Exclusions:".to_string());
            for failure in &self.errors {
                lines.push(format!(
                    "  {} ({}): {}",
                    failure.claim_id, failure.stage, failure.reason
                ));
            }
        }

        lines.join("\n")
    }
}

/// One claim's standing in a conflict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contender {
    /// Claim id
    pub claim_id: ClaimId,
    /// Claim source
    pub source_type: SourceType,
    /// Computed voting weight
    pub weight: f64,
}

/// How a multi-claim group was settled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictRecord {
    /// Relationship key shared by the group
    pub key: String,
    /// Id of the winning claim
    pub winner_id: ClaimId,
    /// Winner's weight before clamping
    pub winner_weight: f64,
    /// Every claim in the group, winner included, in input order
    pub contenders: Vec<Contender>,
}

/// Outcome of conflict resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionReport {
    /// Distinct relationship keys
    pub groups: usize,

    /// Multi-claim groups and how they were settled
    pub conflicts: Vec<ConflictRecord>,

    /// Claims without the `->` convention, keyed by their own id
    pub unkeyed: usize,
}

impl ResolutionReport {
    /// Claims dropped as conflict losers
    pub fn discarded(&self) -> usize {
        self.conflicts
            .iter()
            .map(|c| c.contenders.len().saturating_sub(1))
            .sum()
    }
}

/// A relationship key inference could not use
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedKey {
    /// The offending key
    pub key: String,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of dependency inference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InferenceReport {
    /// Relationship groups examined
    pub groups: usize,

    /// Groups whose key is not a `source -> target` pair
    pub skipped_keys: Vec<SkippedKey>,

    /// Candidates dropped for falling below the confidence cutoff
    pub below_threshold: Vec<Dependency>,

    /// Candidates folded into an existing `(source, target, type)` entry
    pub duplicates_collapsed: usize,
}
