//! Dependency inference
//!
//! Each relationship group becomes at most one typed [`Dependency`]:
//!
//! 1. the key is split into `source -> target` (malformed keys are skipped)
//! 2. the type is classified from the target name, raw data and sources
//! 3. a confidence is blended from seven weighted factors
//! 4. candidates below the cutoff are dropped
//! 5. repeats of `(source, target, type)` collapse onto the higher confidence
//!
//! Registered [`InferenceHook`]s contribute extra candidates that go through
//! steps 4 and 5 as well.

use crate::config::PipelineConfig;
use crate::report::{InferenceReport, SkippedKey};
use crate::resolution::group_by_key;
use crate::PipelineError;
use depsight_domain::{
    current_timestamp_millis, Claim, ConfidenceScore, Dependency, DependencyType, DomainError,
    InferenceHook, RelationshipKey, SourceType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inferred dependencies below this confidence are dropped
pub const DEFAULT_MIN_DEPENDENCY_CONFIDENCE: f64 = 0.4;

/// Claim count and source diversity stop adding confidence past this
pub const SATURATION_COUNT: usize = 3;

const COUNT_WEIGHT: f64 = 0.05;
const DIVERSITY_WEIGHT: f64 = 0.30;
const RELIABILITY_WEIGHT: f64 = 0.20;
const HIGH_RELIABILITY_WEIGHT: f64 = 0.25;
const SPECIFICITY_WEIGHT: f64 = 0.10;
const RECENCY_WEIGHT: f64 = 0.05;
const PRIOR_WEIGHT: f64 = 0.05;

static DATABASE_TARGET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|[-_.:/])(?:db|database|postgres(?:ql)?|mysql|mariadb|oracle|mongo(?:db)?|redis|cache|memcached?|cassandra|dynamodb|elasticsearch|sqlserver|mssql)\d*(?:$|[-_.:/])",
    )
    .expect("database pattern is valid")
});

static API_TRAFFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:GET|POST|PUT|DELETE|PATCH|HEAD|OPTIONS)\b|(?i:/api/)")
        .expect("api pattern is valid")
});

/// Trust multiplier applied to a claim's confidence during inference
pub fn source_reliability(source: &SourceType) -> f64 {
    match source {
        SourceType::Codebase => 1.3,
        SourceType::RouterLog | SourceType::ApiGateway => 1.1,
        SourceType::Network => 0.9,
        _ => 1.0,
    }
}

/// Sources that earn the high-reliability bonus
pub fn is_high_reliability(source: &SourceType) -> bool {
    matches!(
        source,
        SourceType::Codebase
            | SourceType::RouterLog
            | SourceType::ApiGateway
            | SourceType::ConflictResolved
    )
}

/// How much a classification says about the relationship
pub fn type_specificity(dependency_type: DependencyType) -> f64 {
    match dependency_type {
        DependencyType::Database | DependencyType::Api => 1.0,
        DependencyType::Build | DependencyType::Runtime => 0.8,
        DependencyType::Network | DependencyType::Other => 0.6,
    }
}

/// Freshness bucket for a claim `age_hours` old
pub fn recency_factor(age_hours: f64) -> f64 {
    if age_hours <= 1.0 {
        1.0
    } else if age_hours <= 24.0 {
        0.8
    } else if age_hours <= 168.0 {
        0.6
    } else {
        0.3
    }
}

/// Classify a relationship by heuristic precedence
///
/// Database or cache target name, then HTTP verbs or `/api/` in any raw
/// observation, then any codebase claim, else runtime.
pub fn classify(target: &str, claims: &[&Claim]) -> DependencyType {
    if DATABASE_TARGET.is_match(target) {
        DependencyType::Database
    } else if claims.iter().any(|c| API_TRAFFIC.is_match(&c.raw_data)) {
        DependencyType::Api
    } else if claims.iter().any(|c| c.source_type == SourceType::Codebase) {
        DependencyType::Build
    } else {
        DependencyType::Runtime
    }
}

/// Inputs to the confidence blend, each in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceFactors {
    /// Claim count, saturating at three
    pub claim_count: f64,
    /// Distinct sources, saturating at three
    pub source_diversity: f64,
    /// Mean claim confidence scaled by source reliability
    pub weighted_confidence: f64,
    /// 1.0 when any high-reliability source is present
    pub high_reliability: f64,
    /// Specificity of the classified type
    pub type_specificity: f64,
    /// Freshness of the newest claim
    pub recency: f64,
}

impl ConfidenceFactors {
    /// Measure a relationship group
    pub fn measure(
        claims: &[&Claim],
        dependency_type: DependencyType,
        default_confidence: f64,
        now: u64,
    ) -> Self {
        let saturate = |n: usize| n.min(SATURATION_COUNT) as f64 / SATURATION_COUNT as f64;
        let sources: BTreeSet<&SourceType> = claims.iter().map(|c| &c.source_type).collect();

        let weighted_confidence = if claims.is_empty() {
            0.0
        } else {
            claims
                .iter()
                .map(|c| {
                    (c.confidence_or(default_confidence) * source_reliability(&c.source_type))
                        .min(1.0)
                })
                .sum::<f64>()
                / claims.len() as f64
        };

        let newest_age = claims
            .iter()
            .map(|c| c.age_hours(now))
            .fold(f64::INFINITY, f64::min);

        Self {
            claim_count: saturate(claims.len()),
            source_diversity: saturate(sources.len()),
            weighted_confidence,
            high_reliability: if sources.iter().any(|s| is_high_reliability(s)) {
                1.0
            } else {
                0.0
            },
            type_specificity: type_specificity(dependency_type),
            recency: recency_factor(newest_age),
        }
    }

    /// Weighted blend of the factors plus the constant prior, clamped
    pub fn combined(&self) -> ConfidenceScore {
        ConfidenceScore::clamped(
            COUNT_WEIGHT * self.claim_count
                + DIVERSITY_WEIGHT * self.source_diversity
                + RELIABILITY_WEIGHT * self.weighted_confidence
                + HIGH_RELIABILITY_WEIGHT * self.high_reliability
                + SPECIFICITY_WEIGHT * self.type_specificity
                + RECENCY_WEIGHT * self.recency
                + PRIOR_WEIGHT,
        )
    }
}

/// Placeholder for inference across related dependencies
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossDependencyPatterns;

impl InferenceHook for CrossDependencyPatterns {
    fn name(&self) -> &str {
        "cross-dependency-patterns"
    }

    fn infer(&self, _claims: &[Claim]) -> Vec<Dependency> {
        Vec::new()
    }
}

/// Placeholder for inference from co-occurring observations
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalCorrelation;

impl InferenceHook for TemporalCorrelation {
    fn name(&self) -> &str {
        "temporal-correlation"
    }

    fn infer(&self, _claims: &[Claim]) -> Vec<Dependency> {
        Vec::new()
    }
}

/// Accepted dependencies plus the report describing what was dropped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceOutcome {
    /// Deduplicated dependencies in first-appearance order
    pub dependencies: Vec<Dependency>,
    /// Per-batch outcome
    pub report: InferenceReport,
}

/// Third pipeline stage
#[derive(Clone)]
pub struct InferenceEngine {
    config: PipelineConfig,
    hooks: Vec<Arc<dyn InferenceHook>>,
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            hooks: default_hooks(),
        }
    }
}

fn default_hooks() -> Vec<Arc<dyn InferenceHook>> {
    vec![Arc::new(CrossDependencyPatterns), Arc::new(TemporalCorrelation)]
}

impl InferenceEngine {
    /// Create an engine with validated configuration and the built-in hooks
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            hooks: default_hooks(),
        })
    }

    /// Register an additional hook
    pub fn with_hook<H: InferenceHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Names of registered hooks in run order
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    /// Infer against the current time, returning only the dependencies
    pub fn infer_dependencies(&self, claims: &[Claim]) -> Vec<Dependency> {
        self.infer_batch(claims).dependencies
    }

    /// Infer against the current time
    pub fn infer_batch(&self, claims: &[Claim]) -> InferenceOutcome {
        self.infer_batch_at(claims, current_timestamp_millis())
    }

    /// Infer, measuring claim ages against `now` (ms since epoch)
    pub fn infer_batch_at(&self, claims: &[Claim], now: u64) -> InferenceOutcome {
        let mut report = InferenceReport::default();
        let mut accepted = Accepted::default();

        let groups = group_by_key(claims);
        report.groups = groups.len();

        for (key, members) in &groups {
            match self.infer_group(key, members, now) {
                Ok(dependency) => self.accept(dependency, &mut accepted, &mut report),
                Err(e) => {
                    warn!("Skipping relationship '{}': {}", key, e);
                    report.skipped_keys.push(SkippedKey {
                        key: key.as_str().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for hook in &self.hooks {
            let extra = hook.infer(claims);
            if !extra.is_empty() {
                debug!("Hook {} proposed {} dependencies", hook.name(), extra.len());
            }
            for dependency in extra {
                self.accept(dependency, &mut accepted, &mut report);
            }
        }

        info!(
            "Inferred {} dependencies from {} relationships ({} skipped, {} below threshold, {} duplicates)",
            accepted.dependencies.len(),
            report.groups,
            report.skipped_keys.len(),
            report.below_threshold.len(),
            report.duplicates_collapsed
        );

        InferenceOutcome {
            dependencies: accepted.dependencies,
            report,
        }
    }

    fn infer_group(
        &self,
        key: &RelationshipKey,
        members: &[&Claim],
        now: u64,
    ) -> Result<Dependency, DomainError> {
        let (source, target) = key.endpoints()?;
        let dependency_type = classify(&target, members);
        let factors =
            ConfidenceFactors::measure(members, dependency_type, self.config.default_confidence, now);
        Dependency::new(source, target, dependency_type, factors.combined())
    }

    fn accept(&self, dependency: Dependency, accepted: &mut Accepted, report: &mut InferenceReport) {
        if dependency.confidence.value() < self.config.min_dependency_confidence {
            debug!(
                "Dropping {} below cutoff {}",
                dependency, self.config.min_dependency_confidence
            );
            report.below_threshold.push(dependency);
            return;
        }
        if !accepted.insert(dependency) {
            report.duplicates_collapsed += 1;
        }
    }
}

impl std::fmt::Debug for InferenceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceEngine")
            .field("config", &self.config)
            .field("hooks", &self.hook_names())
            .finish()
    }
}

/// Dependencies deduplicated on `(source, target, type)`
#[derive(Default)]
struct Accepted {
    index: HashMap<(String, String, DependencyType), usize>,
    dependencies: Vec<Dependency>,
}

impl Accepted {
    /// Returns false when the dependency collapsed onto an existing entry
    fn insert(&mut self, dependency: Dependency) -> bool {
        let (source, target, dependency_type) = dependency.identity();
        let identity = (source.to_string(), target.to_string(), dependency_type);

        match self.index.get(&identity) {
            Some(&i) => {
                let existing = &mut self.dependencies[i];
                if dependency.confidence > existing.confidence {
                    existing.confidence = dependency.confidence;
                }
                false
            }
            None => {
                self.index.insert(identity, self.dependencies.len());
                self.dependencies.push(dependency);
                true
            }
        }
    }
}
