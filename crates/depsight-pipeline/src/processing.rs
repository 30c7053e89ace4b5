//! Claim processing: normalize, validate and score a batch
//!
//! Each claim runs through the three steps in order. A claim that fails a
//! step is excluded and recorded in the [`BatchReport`]; the rest of the batch
//! carries on.

use crate::report::{BatchReport, ProcessingStage};
use depsight_domain::{
    current_timestamp_millis, Claim, ConfidenceScore, DomainError, ScoringRuleEngine,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scored claims plus the report describing what was dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOutcome {
    /// Surviving claims in input order, each carrying a confidence
    pub claims: Vec<Claim>,
    /// Per-batch outcome
    pub report: BatchReport,
}

/// First pipeline stage
///
/// Holds only the injected scorer, so one engine can serve concurrent
/// batches.
///
/// # Examples
///
/// ```
/// use depsight_domain::{Claim, SourceType};
/// use depsight_pipeline::ClaimProcessingEngine;
/// use depsight_scoring::SourceTableScorer;
///
/// let engine = ClaimProcessingEngine::new(SourceTableScorer::new());
/// let claim = Claim::new("c-1", SourceType::Codebase, "pom.xml", "a -> b", 1_000).unwrap();
///
/// let outcome = engine.process_batch_at(&[claim], 2_000);
/// assert_eq!(outcome.report.success_count, 1);
/// assert_eq!(outcome.claims[0].confidence.unwrap().value(), 0.9);
/// ```
#[derive(Clone)]
pub struct ClaimProcessingEngine {
    scorer: Arc<dyn ScoringRuleEngine>,
}

impl ClaimProcessingEngine {
    /// Create an engine around a scoring strategy
    pub fn new<S: ScoringRuleEngine + 'static>(scorer: S) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }

    /// Create an engine around an already shared scoring strategy
    pub fn from_shared(scorer: Arc<dyn ScoringRuleEngine>) -> Self {
        Self { scorer }
    }

    /// Name of the injected scorer
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Process a batch against the current time, returning only the claims
    pub fn process_claims(&self, raw_claims: &[Claim]) -> Vec<Claim> {
        self.process_batch(raw_claims).claims
    }

    /// Process a batch against the current time
    pub fn process_batch(&self, raw_claims: &[Claim]) -> ProcessingOutcome {
        self.process_batch_at(raw_claims, current_timestamp_millis())
    }

    /// Process a batch, validating timestamps against `now` (ms since epoch)
    pub fn process_batch_at(&self, raw_claims: &[Claim], now: u64) -> ProcessingOutcome {
        let mut report = BatchReport::new();
        let mut claims = Vec::with_capacity(raw_claims.len());

        for raw in raw_claims {
            let normalized = match self.normalize(raw) {
                Ok(claim) => claim,
                Err(e) => {
                    warn!("Excluding claim {} during normalize: {}", raw.id, e);
                    report.record_failure(raw.id.clone(), ProcessingStage::Normalize, e.to_string());
                    continue;
                }
            };

            if let Err(e) = normalized.validate_at(now) {
                warn!("Excluding claim {} during validate: {}", raw.id, e);
                report.record_failure(raw.id.clone(), ProcessingStage::Validate, e.to_string());
                continue;
            }

            claims.push(self.score(&normalized, &mut report));
            report.record_success();
        }

        info!(
            "Processed {} claims with {} scorer: {} accepted, {} excluded",
            raw_claims.len(),
            self.scorer.name(),
            report.success_count,
            report.failure_count
        );

        ProcessingOutcome { claims, report }
    }

    // Identity for now; trimming and id canonicalisation belong here.
    fn normalize(&self, claim: &Claim) -> Result<Claim, DomainError> {
        Ok(claim.clone())
    }

    fn score(&self, claim: &Claim, report: &mut BatchReport) -> Claim {
        let raw = self.scorer.score(claim);
        let score = ConfidenceScore::clamped(raw);

        if score.value() != raw {
            warn!(
                "Scorer {} returned {} for claim {}, clamped to {}",
                self.scorer.name(),
                raw,
                claim.id,
                score
            );
            report.record_clamp(claim.id.clone(), raw, score.value());
        } else {
            debug!("Scored claim {} at {}", claim.id, score);
        }

        claim.with_confidence(score)
    }
}

impl std::fmt::Debug for ClaimProcessingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimProcessingEngine")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsight_domain::SourceType;
    use depsight_scoring::SourceTableScorer;

    const NOW: u64 = 1_700_000_000_000;

    struct FixedScorer(f64);

    impl ScoringRuleEngine for FixedScorer {
        fn score(&self, _claim: &Claim) -> f64 {
            self.0
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn claim(id: &str, timestamp: u64) -> Claim {
        Claim::new(id, SourceType::RouterLog, "GET /api/users", "web-app -> user-service", timestamp)
            .unwrap()
    }

    #[test]
    fn test_scores_every_valid_claim() {
        let engine = ClaimProcessingEngine::new(SourceTableScorer::new());
        let outcome = engine.process_batch_at(&[claim("c-1", NOW), claim("c-2", NOW - 1)], NOW);

        assert_eq!(outcome.claims.len(), 2);
        assert!(outcome.report.is_clean());
        for claim in &outcome.claims {
            assert_eq!(claim.confidence.unwrap().value(), 0.8);
        }
    }

    #[test]
    fn test_future_timestamp_is_excluded() {
        let engine = ClaimProcessingEngine::new(SourceTableScorer::new());
        let outcome = engine.process_batch_at(&[claim("c-1", NOW + 1), claim("c-2", NOW)], NOW);

        assert_eq!(outcome.claims.len(), 1);
        assert_eq!(outcome.claims[0].id.as_str(), "c-2");
        assert_eq!(outcome.report.failure_count, 1);
        assert_eq!(outcome.report.errors[0].claim_id.as_str(), "c-1");
        assert_eq!(outcome.report.errors[0].stage, ProcessingStage::Validate);
    }

    #[test]
    fn test_blank_field_is_excluded() {
        let engine = ClaimProcessingEngine::new(SourceTableScorer::new());
        let mut blank = claim("c-1", NOW);
        blank.raw_data = "   ".to_string();

        let outcome = engine.process_batch_at(&[blank], NOW);
        assert!(outcome.claims.is_empty());
        assert!(outcome.report.errors[0].reason.contains("raw_data"));
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let high = ClaimProcessingEngine::new(FixedScorer(1.7));
        let outcome = high.process_batch_at(&[claim("c-1", NOW)], NOW);
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 1.0);
        assert_eq!(outcome.report.clamped[0].raw, 1.7);

        let low = ClaimProcessingEngine::new(FixedScorer(-0.2));
        let outcome = low.process_batch_at(&[claim("c-1", NOW)], NOW);
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 0.0);
        assert_eq!(outcome.report.success_count, 1);
    }

    #[test]
    fn test_nan_score_is_clamped_to_zero() {
        let engine = ClaimProcessingEngine::new(FixedScorer(f64::NAN));
        let outcome = engine.process_batch_at(&[claim("c-1", NOW)], NOW);
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 0.0);
        assert_eq!(outcome.report.clamped.len(), 1);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let engine = ClaimProcessingEngine::new(FixedScorer(0.4));
        let input = vec![claim("c-1", NOW)];
        let _ = engine.process_batch_at(&input, NOW);
        assert!(input[0].confidence.is_none());
    }

    #[test]
    fn test_shared_scorer() {
        let scorer: Arc<dyn ScoringRuleEngine> = Arc::new(FixedScorer(0.3));
        let engine = ClaimProcessingEngine::from_shared(Arc::clone(&scorer));
        assert_eq!(engine.scorer_name(), "fixed");
        assert_eq!(engine.process_batch_at(&[claim("c-1", NOW)], NOW).claims.len(), 1);
    }
}
