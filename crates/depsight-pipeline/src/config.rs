//! Configuration for the pipeline stages
//!
//! Every threshold the stages use is a named default here and can be
//! overridden from TOML:
//!
//! ```toml
//! default_confidence = 0.5
//! min_resolved_confidence = 0.1
//! recency_window_hours = 24.0
//! recency_decay_base = 0.8
//! recency_floor = 0.1
//! min_dependency_confidence = 0.4
//!
//! [source_priorities]
//! TELEMETRY = 0.75
//! ```

use crate::inference::DEFAULT_MIN_DEPENDENCY_CONFIDENCE;
use crate::resolution::{
    DEFAULT_MIN_RESOLVED_CONFIDENCE, DEFAULT_RECENCY_DECAY_BASE, DEFAULT_RECENCY_FLOOR,
    DEFAULT_RECENCY_WINDOW_HOURS, UNKNOWN_SOURCE_PRIORITY,
};
use crate::PipelineError;
use depsight_domain::SourceType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence assumed for claims that reach resolution unscored
pub const DEFAULT_CLAIM_CONFIDENCE: f64 = 0.5;

/// Fixed conflict-resolution trust per source type
pub fn default_source_priority(source: &SourceType) -> f64 {
    match source {
        SourceType::Codebase => 0.95,
        SourceType::RouterLog => 0.85,
        SourceType::ApiGateway => 0.80,
        SourceType::CiCd => 0.75,
        SourceType::Telemetry => 0.70,
        SourceType::Network => 0.60,
        SourceType::ConflictResolved | SourceType::Other(_) => UNKNOWN_SOURCE_PRIORITY,
    }
}

/// Tunables shared by the resolution and inference stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Confidence given to unscored claims
    pub default_confidence: f64,

    /// Lower clamp for the confidence of a resolved conflict
    pub min_resolved_confidence: f64,

    /// Claims younger than this are not decayed (hours)
    pub recency_window_hours: f64,

    /// Decay base applied per window past the first
    pub recency_decay_base: f64,

    /// Lowest recency weight a claim can fall to
    pub recency_floor: f64,

    /// Inferred dependencies below this confidence are dropped
    pub min_dependency_confidence: f64,

    /// Per-source overrides of the conflict-resolution priority table,
    /// keyed by source tag
    pub source_priorities: BTreeMap<String, f64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_confidence: DEFAULT_CLAIM_CONFIDENCE,
            min_resolved_confidence: DEFAULT_MIN_RESOLVED_CONFIDENCE,
            recency_window_hours: DEFAULT_RECENCY_WINDOW_HOURS,
            recency_decay_base: DEFAULT_RECENCY_DECAY_BASE,
            recency_floor: DEFAULT_RECENCY_FLOOR,
            min_dependency_confidence: DEFAULT_MIN_DEPENDENCY_CONFIDENCE,
            source_priorities: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Strict preset: shorter freshness window, higher acceptance bar
    pub fn strict() -> Self {
        Self {
            recency_window_hours: 12.0,
            recency_decay_base: 0.7,
            min_dependency_confidence: 0.6,
            ..Self::default()
        }
    }

    /// Lenient preset: longer freshness window, lower acceptance bar
    pub fn lenient() -> Self {
        Self {
            recency_window_hours: 72.0,
            recency_decay_base: 0.9,
            min_dependency_confidence: 0.25,
            ..Self::default()
        }
    }

    /// Conflict-resolution priority of `source`, honouring overrides
    pub fn source_priority(&self, source: &SourceType) -> f64 {
        self.source_priorities
            .iter()
            .find(|(tag, _)| SourceType::parse(tag) == *source)
            .map(|(_, priority)| *priority)
            .unwrap_or_else(|| default_source_priority(source))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        let unit_values = [
            ("default_confidence", self.default_confidence),
            ("min_resolved_confidence", self.min_resolved_confidence),
            ("recency_floor", self.recency_floor),
            ("min_dependency_confidence", self.min_dependency_confidence),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::Config(format!(
                    "{} must be within [0.0, 1.0], got {}",
                    name, value
                )));
            }
        }
        if !(self.recency_window_hours > 0.0) {
            return Err(PipelineError::Config(
                "recency_window_hours must be greater than 0".to_string(),
            ));
        }
        if !(self.recency_decay_base > 0.0 && self.recency_decay_base <= 1.0) {
            return Err(PipelineError::Config(
                "recency_decay_base must be within (0.0, 1.0]".to_string(),
            ));
        }
        for (tag, priority) in &self.source_priorities {
            if !(0.0..=1.0).contains(priority) {
                return Err(PipelineError::Config(format!(
                    "source priority for {} must be within [0.0, 1.0], got {}",
                    tag, priority
                )));
            }
        }
        Ok(())
    }

    /// Load and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: PipelineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recency_window_hours, 24.0);
        assert_eq!(config.recency_decay_base, 0.8);
        assert_eq!(config.min_dependency_confidence, 0.4);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::strict().validate().is_ok());
        assert!(PipelineConfig::lenient().validate().is_ok());
        assert!(
            PipelineConfig::strict().min_dependency_confidence
                > PipelineConfig::lenient().min_dependency_confidence
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut config = PipelineConfig::default();
        config.min_dependency_confidence = 1.2;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.recency_window_hours = 0.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.recency_decay_base = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.source_priorities.insert("CODEBASE".into(), -0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_source_priority_table_and_overrides() {
        let mut config = PipelineConfig::default();
        assert_eq!(config.source_priority(&SourceType::Codebase), 0.95);
        assert_eq!(config.source_priority(&SourceType::Network), 0.60);
        assert_eq!(config.source_priority(&SourceType::parse("SNMP")), 0.5);

        config.source_priorities.insert("telemetry".into(), 0.9);
        assert_eq!(config.source_priority(&SourceType::Telemetry), 0.9);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            min_dependency_confidence = 0.55

            [source_priorities]
            NETWORK = 0.65
            "#,
        )
        .unwrap();
        assert_eq!(config.min_dependency_confidence, 0.55);
        assert_eq!(config.recency_window_hours, DEFAULT_RECENCY_WINDOW_HOURS);
        assert_eq!(config.source_priority(&SourceType::Network), 0.65);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PipelineConfig::lenient();
        config.source_priorities.insert("CI_CD".into(), 0.7);
        let parsed = PipelineConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
