//! Trait definitions for pluggable strategies
//!
//! These traits define the seams where behaviour is injected into the pipeline.
//! Implementations live in other crates.

use crate::{Claim, Dependency};
use std::sync::Arc;

/// Strategy computing the trust in a single claim
///
/// Implemented by `depsight-scoring`. Implementations may return values outside
/// `[0.0, 1.0]`; the processing stage clamps and reports them.
///
/// Engines are shared across concurrent batches, hence `Send + Sync`.
pub trait ScoringRuleEngine: Send + Sync {
    /// Score a claim
    fn score(&self, claim: &Claim) -> f64;

    /// Short name used in logs and reports
    fn name(&self) -> &str;
}

impl<T: ScoringRuleEngine + ?Sized> ScoringRuleEngine for Arc<T> {
    fn score(&self, claim: &Claim) -> f64 {
        (**self).score(claim)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: ScoringRuleEngine + ?Sized> ScoringRuleEngine for Box<T> {
    fn score(&self, claim: &Claim) -> f64 {
        (**self).score(claim)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Additional inference pass run over the full set of resolved claims
///
/// Hooks see every claim at once, so they can infer dependencies no single
/// relationship group shows (shared patterns, temporal correlation). Their
/// output goes through the same cutoff and deduplication as the main pass.
pub trait InferenceHook: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Infer extra dependencies from resolved claims
    fn infer(&self, claims: &[Claim]) -> Vec<Dependency>;
}
