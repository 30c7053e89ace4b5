//! Source type module - where a claim was observed

use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin category of a claim
///
/// Adapters tag each claim with the kind of signal it was extracted from.
/// The tag drives trust weighting during conflict resolution and inference.
/// Tags outside the known set are preserved verbatim as [`SourceType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    /// Build manifests and source code analysis
    Codebase,

    /// Router / load balancer access logs
    RouterLog,

    /// API gateway traces
    ApiGateway,

    /// CI/CD pipeline definitions and runs
    CiCd,

    /// Runtime telemetry (spans, metrics)
    Telemetry,

    /// Raw network flow observations
    Network,

    /// Synthesized by conflict resolution from several claims
    ConflictResolved,

    /// Any tag the pipeline has no special knowledge of
    Other(String),
}

impl SourceType {
    /// Canonical upper-case tag
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::Codebase => "CODEBASE",
            SourceType::RouterLog => "ROUTER_LOG",
            SourceType::ApiGateway => "API_GATEWAY",
            SourceType::CiCd => "CI_CD",
            SourceType::Telemetry => "TELEMETRY",
            SourceType::Network => "NETWORK",
            SourceType::ConflictResolved => "CONFLICT_RESOLVED",
            SourceType::Other(tag) => tag,
        }
    }

    /// Parse a tag, accepting any case and `-` in place of `_`
    ///
    /// Never fails: unknown tags become [`SourceType::Other`] with the input trimmed.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_uppercase().replace('-', "_").as_str() {
            "CODEBASE" => SourceType::Codebase,
            "ROUTER_LOG" => SourceType::RouterLog,
            "API_GATEWAY" => SourceType::ApiGateway,
            "CI_CD" => SourceType::CiCd,
            "TELEMETRY" => SourceType::Telemetry,
            "NETWORK" => SourceType::Network,
            "CONFLICT_RESOLVED" => SourceType::ConflictResolved,
            _ => SourceType::Other(trimmed.to_string()),
        }
    }

    /// Whether the tag carries no information at all
    pub fn is_blank(&self) -> bool {
        matches!(self, SourceType::Other(tag) if tag.trim().is_empty())
    }

    /// All well-known tags, in descending trust order
    pub fn known() -> [SourceType; 7] {
        [
            SourceType::Codebase,
            SourceType::RouterLog,
            SourceType::ApiGateway,
            SourceType::CiCd,
            SourceType::Telemetry,
            SourceType::Network,
            SourceType::ConflictResolved,
        ]
    }
}

impl From<String> for SourceType {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<SourceType> for String {
    fn from(source: SourceType) -> Self {
        source.as_str().to_string()
    }
}

impl std::str::FromStr for SourceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
