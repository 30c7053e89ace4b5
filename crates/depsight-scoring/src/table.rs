//! Static, table-driven scoring

use depsight_domain::{Claim, ScoringRuleEngine, SourceType};
use std::collections::HashMap;

/// Score for sources the table has no entry for
pub const UNKNOWN_SOURCE_SCORE: f64 = 0.5;

/// Built-in base score per source type
pub fn default_source_score(source: &SourceType) -> f64 {
    match source {
        SourceType::Codebase => 0.9,
        SourceType::RouterLog => 0.8,
        SourceType::ApiGateway => 0.8,
        SourceType::CiCd => 0.75,
        SourceType::Telemetry => 0.7,
        SourceType::Network => 0.6,
        SourceType::ConflictResolved => 0.8,
        SourceType::Other(_) => UNKNOWN_SOURCE_SCORE,
    }
}

/// Scores claims from a fixed per-source table
///
/// When an adapter already attached a confidence to the claim, that value is
/// kept unless [`SourceTableScorer::ignore_claim_confidence`] was called.
///
/// # Examples
///
/// ```
/// use depsight_domain::{Claim, ScoringRuleEngine, SourceType};
/// use depsight_scoring::SourceTableScorer;
///
/// let scorer = SourceTableScorer::new().with_score(SourceType::Telemetry, 0.65);
/// let claim = Claim::new("c-1", SourceType::Telemetry, "span", "a -> b", 0).unwrap();
/// assert_eq!(scorer.score(&claim), 0.65);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceTableScorer {
    overrides: HashMap<SourceType, f64>,
    ignore_claim_confidence: bool,
}

impl SourceTableScorer {
    /// Scorer using the built-in table
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the score for one source type
    pub fn with_score(mut self, source: SourceType, score: f64) -> Self {
        self.overrides.insert(source, score);
        self
    }

    /// Always score from the table, even for pre-scored claims
    pub fn ignore_claim_confidence(mut self) -> Self {
        self.ignore_claim_confidence = true;
        self
    }

    /// Table score for a source type
    pub fn source_score(&self, source: &SourceType) -> f64 {
        self.overrides
            .get(source)
            .copied()
            .unwrap_or_else(|| default_source_score(source))
    }
}

impl ScoringRuleEngine for SourceTableScorer {
    fn score(&self, claim: &Claim) -> f64 {
        match claim.confidence {
            Some(confidence) if !self.ignore_claim_confidence => confidence.value(),
            _ => self.source_score(&claim.source_type),
        }
    }

    fn name(&self) -> &str {
        "source-table"
    }
}
