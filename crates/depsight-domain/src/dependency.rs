//! Dependency module - accepted, typed relationships between applications

use crate::{ConfidenceScore, DomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of dependency between two applications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyType {
    /// Runtime call relationship (the default)
    Runtime,

    /// Build-time / library dependency
    Build,

    /// HTTP API usage
    Api,

    /// Database or cache backend
    Database,

    /// Plain network reachability
    Network,

    /// Anything else
    Other,
}

impl DependencyType {
    /// Upper-case tag
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Runtime => "RUNTIME",
            DependencyType::Build => "BUILD",
            DependencyType::Api => "API",
            DependencyType::Database => "DATABASE",
            DependencyType::Network => "NETWORK",
            DependencyType::Other => "OTHER",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, confidence-scored dependency of `source_app_id` on `target_app_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    /// Depending application
    pub source_app_id: String,

    /// Application depended upon
    pub target_app_id: String,

    /// Classified kind
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,

    /// Trust in the dependency
    pub confidence: ConfidenceScore,
}

impl Dependency {
    /// Create a dependency, rejecting blank endpoints
    pub fn new(
        source_app_id: impl Into<String>,
        target_app_id: impl Into<String>,
        dependency_type: DependencyType,
        confidence: ConfidenceScore,
    ) -> Result<Self, DomainError> {
        let source_app_id = source_app_id.into();
        let target_app_id = target_app_id.into();
        if source_app_id.trim().is_empty() {
            return Err(DomainError::BlankField("source_app_id"));
        }
        if target_app_id.trim().is_empty() {
            return Err(DomainError::BlankField("target_app_id"));
        }
        Ok(Self {
            source_app_id,
            target_app_id,
            dependency_type,
            confidence,
        })
    }

    /// Identity used for deduplication: `(source, target, type)`
    pub fn identity(&self) -> (&str, &str, DependencyType) {
        (&self.source_app_id, &self.target_app_id, self.dependency_type)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}, {}]",
            self.source_app_id, self.target_app_id, self.dependency_type, self.confidence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_endpoints_rejected() {
        let score = ConfidenceScore::new(0.5).unwrap();
        assert!(Dependency::new("", "b", DependencyType::Api, score).is_err());
        assert!(Dependency::new("a", "  ", DependencyType::Api, score).is_err());
    }

    #[test]
    fn test_json_uses_type_field() {
        let dep = Dependency::new(
            "order-service",
            "orders-db",
            DependencyType::Database,
            ConfidenceScore::new(0.9).unwrap(),
        )
        .unwrap();
        let json = serde_json::to_value(&dep).unwrap();
        assert_eq!(json["type"], "DATABASE");
        assert_eq!(json["confidence"], 0.9);
    }
}
