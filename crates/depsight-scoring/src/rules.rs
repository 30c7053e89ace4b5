//! Configuration-driven scoring

use crate::RuleStore;
use depsight_domain::{Claim, ScoringRuleEngine};
use std::sync::Arc;

/// Scores claims with the live rule set of a [`RuleStore`]
///
/// Each call takes a snapshot of the rule set, so a concurrent
/// [`RuleStore::replace`] is seen either entirely or not at all.
///
/// # Examples
///
/// ```
/// use depsight_domain::{Claim, ScoringRuleEngine, SourceType};
/// use depsight_scoring::{RuleBasedScorer, RuleSet, RuleStore, ScoringRule};
/// use std::sync::Arc;
///
/// let mut rules = RuleSet::empty(0.4);
/// rules.rules.push(ScoringRule::for_source(SourceType::CiCd, 0.75));
/// let store = Arc::new(RuleStore::in_memory(rules).unwrap());
/// let scorer = RuleBasedScorer::new(store);
///
/// let claim = Claim::new("c-1", SourceType::CiCd, "deploy step", "a -> b", 0).unwrap();
/// assert_eq!(scorer.score(&claim), 0.75);
/// ```
#[derive(Clone)]
pub struct RuleBasedScorer {
    store: Arc<RuleStore>,
}

impl RuleBasedScorer {
    /// Scorer reading from `store`
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// Backing store
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }
}

impl ScoringRuleEngine for RuleBasedScorer {
    fn score(&self, claim: &Claim) -> f64 {
        self.store.snapshot().score(claim)
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}
