//! Conflict resolution
//!
//! Claims describing the same relationship are grouped and each multi-claim
//! group is settled by weighted vote:
//!
//! ```text
//! weight = confidence × source priority × recency × frequency
//! ```
//!
//! The winner continues as a `CONFLICT_RESOLVED` claim whose
//! confidence is the winning weight; the losers are dropped and listed in the
//! [`ResolutionReport`].
//!
//! Frequency is counted per key across the whole input batch rather than per
//! group. With exact key grouping both counts are the same.

use crate::config::PipelineConfig;
use crate::report::{ConflictRecord, Contender, ResolutionReport};
use crate::PipelineError;
use depsight_domain::{current_timestamp_millis, Claim, ConfidenceScore, RelationshipKey};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Priority for sources outside the fixed table
pub const UNKNOWN_SOURCE_PRIORITY: f64 = 0.5;

/// Age below which a claim is not decayed (hours)
pub const DEFAULT_RECENCY_WINDOW_HOURS: f64 = 24.0;

/// Decay applied per window past the first
pub const DEFAULT_RECENCY_DECAY_BASE: f64 = 0.8;

/// Lowest recency weight
pub const DEFAULT_RECENCY_FLOOR: f64 = 0.1;

/// Lower clamp for resolved confidence
pub const DEFAULT_MIN_RESOLVED_CONFIDENCE: f64 = 0.1;

/// Frequency weight for keys seen two or three times
pub const REPEATED_FREQUENCY_WEIGHT: f64 = 1.1;

/// Frequency weight for keys seen four times or more
pub const FREQUENT_FREQUENCY_WEIGHT: f64 = 1.2;

/// Resolved claims plus the report describing each vote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionOutcome {
    /// One claim per distinct relationship key, in first-appearance order
    pub claims: Vec<Claim>,
    /// Per-batch outcome
    pub report: ResolutionReport,
}

/// Second pipeline stage
#[derive(Debug, Clone, Default)]
pub struct ConflictResolutionEngine {
    config: PipelineConfig,
}

impl ConflictResolutionEngine {
    /// Create an engine with validated configuration
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve against the current time, returning only the claims
    pub fn resolve_claims(&self, claims: &[Claim]) -> Vec<Claim> {
        self.resolve_batch(claims).claims
    }

    /// Resolve against the current time
    pub fn resolve_batch(&self, claims: &[Claim]) -> ResolutionOutcome {
        self.resolve_batch_at(claims, current_timestamp_millis())
    }

    /// Resolve, measuring claim ages against `now` (ms since epoch)
    pub fn resolve_batch_at(&self, claims: &[Claim], now: u64) -> ResolutionOutcome {
        let mut report = ResolutionReport::default();
        let groups = group_by_key(claims);
        report.groups = groups.len();
        report.unkeyed = groups.iter().filter(|(key, _)| !key.is_edge()).count();

        let mut resolved = Vec::with_capacity(groups.len());
        for (key, members) in &groups {
            match members.as_slice() {
                [single] => resolved.push(self.pass_through(single)),
                _ => {
                    // Batch-wide occurrences of the key
                    let frequency = members.len();
                    let (claim, record) = self.vote(key, members, frequency, now);
                    resolved.push(claim);
                    report.conflicts.push(record);
                }
            }
        }

        info!(
            "Resolved {} claims into {} relationships ({} conflicts, {} claims discarded)",
            claims.len(),
            resolved.len(),
            report.conflicts.len(),
            report.discarded()
        );

        ResolutionOutcome {
            claims: resolved,
            report,
        }
    }

    /// Voting weight of one claim
    pub fn weight(&self, claim: &Claim, frequency: usize, now: u64) -> f64 {
        claim.confidence_or(self.config.default_confidence)
            * self.config.source_priority(&claim.source_type)
            * self.recency_weight(claim.age_hours(now))
            * frequency_weight(frequency)
    }

    /// Recency weight for a claim `age_hours` old
    ///
    /// 1.0 inside the window, then decays by the configured base once per
    /// window, never below the floor.
    pub fn recency_weight(&self, age_hours: f64) -> f64 {
        let window = self.config.recency_window_hours;
        if age_hours <= window {
            return 1.0;
        }
        let decayed = self
            .config
            .recency_decay_base
            .powf((age_hours - window) / window);
        decayed.max(self.config.recency_floor)
    }

    fn pass_through(&self, claim: &Claim) -> Claim {
        match claim.confidence {
            Some(_) => claim.clone(),
            None => claim.with_confidence(ConfidenceScore::clamped(self.config.default_confidence)),
        }
    }

    fn vote(
        &self,
        key: &RelationshipKey,
        members: &[&Claim],
        frequency: usize,
        now: u64,
    ) -> (Claim, ConflictRecord) {
        let contenders: Vec<Contender> = members
            .iter()
            .map(|claim| Contender {
                claim_id: claim.id.clone(),
                source_type: claim.source_type.clone(),
                weight: self.weight(claim, frequency, now),
            })
            .collect();

        // Strictly greater, so ties keep the earliest claim
        let mut best = 0;
        for (i, contender) in contenders.iter().enumerate().skip(1) {
            if contender.weight > contenders[best].weight {
                best = i;
            }
        }

        let winner = members[best];
        let winner_weight = contenders[best].weight;
        let score = ConfidenceScore::clamped_between(
            winner_weight,
            self.config.min_resolved_confidence,
            1.0,
        );
        debug!(
            "Conflict on '{}': claim {} ({}) wins with weight {:.3} over {} others",
            key,
            winner.id,
            winner.source_type,
            winner_weight,
            members.len() - 1
        );

        let record = ConflictRecord {
            key: key.as_str().to_string(),
            winner_id: winner.id.clone(),
            winner_weight,
            contenders,
        };
        (winner.resolved(score), record)
    }
}

/// Frequency weight for a key seen `count` times in the batch
pub fn frequency_weight(count: usize) -> f64 {
    match count {
        0 | 1 => 1.0,
        2 | 3 => REPEATED_FREQUENCY_WEIGHT,
        _ => FREQUENT_FREQUENCY_WEIGHT,
    }
}

/// Group claims by relationship key, keeping first-appearance order for both
/// groups and members
pub(crate) fn group_by_key(claims: &[Claim]) -> Vec<(RelationshipKey, Vec<&Claim>)> {
    let mut index: HashMap<RelationshipKey, usize> = HashMap::new();
    let mut groups: Vec<(RelationshipKey, Vec<&Claim>)> = Vec::new();

    for claim in claims {
        let key = RelationshipKey::from_claim(claim);
        match index.get(&key) {
            Some(&i) => groups[i].1.push(claim),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![claim]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsight_domain::SourceType;

    const HOUR: u64 = 3_600_000;
    const NOW: u64 = 1_700_000_000_000;

    fn claim(id: &str, source: SourceType, data: &str, confidence: Option<f64>, age_hours: u64) -> Claim {
        let claim = Claim::new(id, source, "raw", data, NOW - age_hours * HOUR).unwrap();
        match confidence {
            Some(c) => claim.with_confidence(ConfidenceScore::new(c).unwrap()),
            None => claim,
        }
    }

    fn engine() -> ConflictResolutionEngine {
        ConflictResolutionEngine::default()
    }

    #[test]
    fn test_frequency_weight_buckets() {
        assert_eq!(frequency_weight(1), 1.0);
        assert_eq!(frequency_weight(2), 1.1);
        assert_eq!(frequency_weight(3), 1.1);
        assert_eq!(frequency_weight(4), 1.2);
        assert_eq!(frequency_weight(40), 1.2);
    }

    #[test]
    fn test_recency_weight_decay() {
        let engine = engine();
        assert_eq!(engine.recency_weight(0.0), 1.0);
        assert_eq!(engine.recency_weight(24.0), 1.0);
        assert!((engine.recency_weight(48.0) - 0.8).abs() < 1e-9);
        assert!((engine.recency_weight(72.0) - 0.64).abs() < 1e-9);
        assert_eq!(engine.recency_weight(24.0 * 100.0), 0.1);
    }

    #[test]
    fn test_singleton_passes_through() {
        let scored = claim("c-1", SourceType::Network, "a -> b", Some(0.3), 0);
        let outcome = engine().resolve_batch_at(&[scored.clone()], NOW);
        assert_eq!(outcome.claims, vec![scored]);
        assert!(outcome.report.conflicts.is_empty());
    }

    #[test]
    fn test_unscored_singleton_defaults() {
        let outcome = engine().resolve_batch_at(&[claim("c-1", SourceType::Network, "a -> b", None, 0)], NOW);
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 0.5);
        assert_eq!(outcome.claims[0].source_type, SourceType::Network);
    }

    #[test]
    fn test_conflict_picks_highest_weight() {
        let claims = vec![
            claim("c-1", SourceType::Network, "web-app -> api", Some(0.9), 0),
            claim("c-2", SourceType::Codebase, "Web-App -> API", Some(0.8), 0),
        ];
        let outcome = engine().resolve_batch_at(&claims, NOW);

        assert_eq!(outcome.claims.len(), 1);
        let resolved = &outcome.claims[0];
        assert_eq!(resolved.id.as_str(), "c-2");
        assert_eq!(resolved.source_type, SourceType::ConflictResolved);
        // 0.8 × 0.95 × 1.0 × 1.1
        assert!((resolved.confidence.unwrap().value() - 0.836).abs() < 1e-9);

        let record = &outcome.report.conflicts[0];
        assert_eq!(record.key, "web-app -> api");
        assert_eq!(record.contenders.len(), 2);
        assert_eq!(outcome.report.discarded(), 1);
    }

    #[test]
    fn test_resolved_confidence_is_clamped() {
        let claims: Vec<Claim> = (0..5)
            .map(|i| claim(&format!("c-{i}"), SourceType::Codebase, "a -> b", Some(1.0), 0))
            .collect();
        let outcome = engine().resolve_batch_at(&claims, NOW);
        // 1.0 × 0.95 × 1.2 exceeds the ceiling
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 1.0);

        let weak = vec![
            claim("w-1", SourceType::Network, "a -> b", Some(0.05), 24 * 30),
            claim("w-2", SourceType::Network, "a -> b", Some(0.05), 24 * 30),
        ];
        let outcome = engine().resolve_batch_at(&weak, NOW);
        assert_eq!(outcome.claims[0].confidence.unwrap().value(), 0.1);
    }

    #[test]
    fn test_tie_goes_to_earliest_claim() {
        let claims = vec![
            claim("first", SourceType::Telemetry, "a -> b", Some(0.6), 0),
            claim("second", SourceType::Telemetry, "a -> b", Some(0.6), 0),
        ];
        let outcome = engine().resolve_batch_at(&claims, NOW);
        assert_eq!(outcome.claims[0].id.as_str(), "first");
    }

    #[test]
    fn test_stale_claim_loses_to_fresh_one() {
        let claims = vec![
            claim("old", SourceType::Codebase, "a -> b", Some(0.9), 24 * 10),
            claim("new", SourceType::Telemetry, "a -> b", Some(0.9), 1),
        ];
        let outcome = engine().resolve_batch_at(&claims, NOW);
        assert_eq!(outcome.claims[0].id.as_str(), "new");
    }

    #[test]
    fn test_unkeyed_claims_never_merge() {
        let claims = vec![
            claim("c-1", SourceType::Network, "10.0.0.4:5432", Some(0.4), 0),
            claim("c-2", SourceType::Network, "10.0.0.4:5432", Some(0.4), 0),
        ];
        let outcome = engine().resolve_batch_at(&claims, NOW);
        assert_eq!(outcome.claims.len(), 2);
        assert_eq!(outcome.report.unkeyed, 2);
        assert!(outcome.report.conflicts.is_empty());
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let claims = vec![
            claim("c-1", SourceType::Network, "z -> y", Some(0.4), 0),
            claim("c-2", SourceType::Network, "a -> b", Some(0.4), 0),
            claim("c-3", SourceType::Codebase, "z -> y", Some(0.9), 0),
        ];
        let outcome = engine().resolve_batch_at(&claims, NOW);
        let keys: Vec<&str> = outcome.claims.iter().map(|c| c.processed_data.as_str()).collect();
        assert_eq!(keys, ["z -> y", "a -> b"]);
    }

    #[test]
    fn test_priority_override() {
        let mut config = PipelineConfig::default();
        config.source_priorities.insert("NETWORK".into(), 1.0);
        let engine = ConflictResolutionEngine::new(config).unwrap();

        let claims = vec![
            claim("net", SourceType::Network, "a -> b", Some(0.9), 0),
            claim("code", SourceType::Codebase, "a -> b", Some(0.9), 0),
        ];
        assert_eq!(engine.resolve_batch_at(&claims, NOW).claims[0].id.as_str(), "net");
    }
}
