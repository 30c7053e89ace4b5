//! Scoring rule configuration
//!
//! A [`RuleSet`] is the versioned record behind [`crate::RuleBasedScorer`].
//! It is stored as TOML:
//!
//! ```toml
//! version = 1
//! default_score = 0.5
//!
//! [[rules]]
//! name = "manifest"
//! source_type = "CODEBASE"
//! score = 0.9
//!
//! [[rules]]
//! name = "health-checks"
//! contains = "/health"
//! priority = 10
//! score = 0.2
//! ```

use crate::ScoringError;
use depsight_domain::{Claim, SourceType};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Rule set format version understood by this build
pub const RULE_SET_VERSION: u32 = 1;

/// Score returned when no rule matches
pub const DEFAULT_RULE_SCORE: f64 = 0.5;

/// One scoring rule
///
/// A rule matches a claim when it is enabled, its `source_type` (if set)
/// equals the claim's, and its `contains` text (if set) occurs in the claim's
/// raw or processed data, ignoring case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Unique rule name
    pub name: String,

    /// Disabled rules never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Higher priority rules are tried first; ties keep declaration order
    #[serde(default)]
    pub priority: i32,

    /// Restrict to one source type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,

    /// Restrict to claims mentioning this text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    /// Score assigned on match
    pub score: f64,
}

fn default_enabled() -> bool {
    true
}

fn default_score() -> f64 {
    DEFAULT_RULE_SCORE
}

impl ScoringRule {
    /// Rule matching every claim of one source type
    pub fn for_source(source_type: SourceType, score: f64) -> Self {
        Self {
            name: format!("source:{}", source_type.as_str().to_lowercase()),
            enabled: true,
            priority: 0,
            source_type: Some(source_type),
            contains: None,
            score,
        }
    }

    /// Whether this rule applies to `claim`
    pub fn matches(&self, claim: &Claim) -> bool {
        if !self.enabled {
            return false;
        }
        if let Some(source_type) = &self.source_type {
            if *source_type != claim.source_type {
                return false;
            }
        }
        if let Some(needle) = &self.contains {
            let needle = needle.to_lowercase();
            let in_raw = claim.raw_data.to_lowercase().contains(&needle);
            let in_processed = claim.processed_data.to_lowercase().contains(&needle);
            if !in_raw && !in_processed {
                return false;
            }
        }
        true
    }
}

/// Versioned, file-persisted scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Format version, must equal [`RULE_SET_VERSION`]
    pub version: u32,

    /// Score when no rule matches
    #[serde(default = "default_score")]
    pub default_score: f64,

    /// Rules in declaration order
    #[serde(default)]
    pub rules: Vec<ScoringRule>,
}

impl Default for RuleSet {
    /// One rule per well-known source, mirroring the static source table
    fn default() -> Self {
        let rules = SourceType::known()
            .into_iter()
            .map(|source| {
                let score = crate::table::default_source_score(&source);
                ScoringRule::for_source(source, score)
            })
            .collect();

        Self {
            version: RULE_SET_VERSION,
            default_score: DEFAULT_RULE_SCORE,
            rules,
        }
    }
}

impl RuleSet {
    /// Rule set with no rules; everything scores `default_score`
    pub fn empty(default_score: f64) -> Self {
        Self {
            version: RULE_SET_VERSION,
            default_score,
            rules: Vec::new(),
        }
    }

    /// Validate version, score ranges and rule names
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.version != RULE_SET_VERSION {
            return Err(ScoringError::UnsupportedVersion {
                found: self.version,
                supported: RULE_SET_VERSION,
            });
        }
        if !(0.0..=1.0).contains(&self.default_score) {
            return Err(ScoringError::InvalidRule(format!(
                "default_score {} is outside [0.0, 1.0]",
                self.default_score
            )));
        }

        let mut names = HashSet::new();
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(ScoringError::InvalidRule("rule name must not be blank".into()));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(ScoringError::InvalidRule(format!(
                    "duplicate rule name '{}'",
                    rule.name
                )));
            }
            if !(0.0..=1.0).contains(&rule.score) {
                return Err(ScoringError::InvalidRule(format!(
                    "rule '{}' score {} is outside [0.0, 1.0]",
                    rule.name, rule.score
                )));
            }
        }
        Ok(())
    }

    /// Highest-priority enabled rule matching `claim`
    pub fn first_match(&self, claim: &Claim) -> Option<&ScoringRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(claim))
            .min_by_key(|rule| Reverse(rule.priority))
    }

    /// Score for `claim` under this rule set
    pub fn score(&self, claim: &Claim) -> f64 {
        self.first_match(claim)
            .map(|rule| rule.score)
            .unwrap_or(self.default_score)
    }

    /// Parse and validate a rule set from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, ScoringError> {
        let rules: RuleSet = toml::from_str(toml_str)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ScoringError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
