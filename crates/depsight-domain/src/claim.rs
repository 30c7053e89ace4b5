//! Claim module - the unit of evidence flowing through the pipeline

use crate::{ConfidenceScore, DomainError, SourceType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Identifier of a claim as assigned by the adapter that produced it
///
/// Adapters usually carry a natural id over from their source (a log line
/// offset, a trace id). Those without one can call [`ClaimId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, chronologically sortable UUIDv7 identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use depsight_domain::ClaimId;
    ///
    /// let id = ClaimId::generate();
    /// assert_eq!(id.as_str().len(), 36);
    /// ```
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A single, source-attributed observation that one application depends on another
///
/// `processed_data` follows the `"<source-app> -> <target-app>"` convention.
/// Claims are never mutated; every pipeline stage derives a new claim with
/// [`Claim::with_confidence`] or [`Claim::resolved`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Origin category
    pub source_type: SourceType,

    /// Original observation text, kept for classification heuristics
    pub raw_data: String,

    /// Canonical `source -> target` form
    pub processed_data: String,

    /// Observation time (ms since epoch)
    pub timestamp: u64,

    /// Assigned trust, absent until scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceScore>,
}

impl Claim {
    /// Create an unscored claim, rejecting blank fields
    ///
    /// The timestamp check needs a reference time and is left to
    /// [`Claim::validate_at`].
    ///
    /// # Examples
    ///
    /// ```
    /// use depsight_domain::{Claim, SourceType};
    ///
    /// let claim = Claim::new(
    ///     "c-1",
    ///     SourceType::Codebase,
    ///     "pom.xml: order-service depends on user-service-client",
    ///     "order-service -> user-service",
    ///     1_700_000_000_000,
    /// ).unwrap();
    /// assert!(claim.confidence.is_none());
    /// ```
    pub fn new(
        id: impl Into<ClaimId>,
        source_type: SourceType,
        raw_data: impl Into<String>,
        processed_data: impl Into<String>,
        timestamp: u64,
    ) -> Result<Self, DomainError> {
        let claim = Self {
            id: id.into(),
            source_type,
            raw_data: raw_data.into(),
            processed_data: processed_data.into(),
            timestamp,
            confidence: None,
        };
        claim.validate_fields()?;
        Ok(claim)
    }

    /// Check required fields are present and non-blank
    pub fn validate_fields(&self) -> Result<(), DomainError> {
        if self.id.is_blank() {
            return Err(DomainError::BlankField("id"));
        }
        if self.source_type.is_blank() {
            return Err(DomainError::BlankField("source_type"));
        }
        if self.raw_data.trim().is_empty() {
            return Err(DomainError::BlankField("raw_data"));
        }
        if self.processed_data.trim().is_empty() {
            return Err(DomainError::BlankField("processed_data"));
        }
        Ok(())
    }

    /// Full validation against a reference time: fields, then `timestamp <= now`
    pub fn validate_at(&self, now: u64) -> Result<(), DomainError> {
        self.validate_fields()?;
        if self.timestamp > now {
            return Err(DomainError::FutureTimestamp {
                timestamp: self.timestamp,
                now,
            });
        }
        Ok(())
    }

    /// Derive a copy carrying `score`
    pub fn with_confidence(&self, score: ConfidenceScore) -> Self {
        Self {
            confidence: Some(score),
            ..self.clone()
        }
    }

    /// Derive the claim that represents a settled conflict
    ///
    /// Keeps this claim's identity, data and timestamp, re-tags it as
    /// [`SourceType::ConflictResolved`] and attaches `score`.
    pub fn resolved(&self, score: ConfidenceScore) -> Self {
        Self {
            source_type: SourceType::ConflictResolved,
            confidence: Some(score),
            ..self.clone()
        }
    }

    /// Confidence, or `fallback` when unscored
    pub fn confidence_or(&self, fallback: f64) -> f64 {
        self.confidence.map(|c| c.value()).unwrap_or(fallback)
    }

    /// Age in hours relative to `now`; zero for timestamps after `now`
    pub fn age_hours(&self, now: u64) -> f64 {
        now.saturating_sub(self.timestamp) as f64 / 3_600_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claim {
        Claim::new(
            "c-1",
            SourceType::RouterLog,
            "GET /users 200 web-app->user-service",
            "web-app -> user-service",
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_blank_fields() {
        let err = Claim::new("  ", SourceType::Codebase, "raw", "a -> b", 0).unwrap_err();
        assert_eq!(err, DomainError::BlankField("id"));

        let err = Claim::new("c", SourceType::Codebase, "", "a -> b", 0).unwrap_err();
        assert_eq!(err, DomainError::BlankField("raw_data"));

        let err = Claim::new("c", SourceType::Codebase, "raw", " ", 0).unwrap_err();
        assert_eq!(err, DomainError::BlankField("processed_data"));

        let err = Claim::new("c", SourceType::parse(""), "raw", "a -> b", 0).unwrap_err();
        assert_eq!(err, DomainError::BlankField("source_type"));
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let claim = sample();
        assert!(claim.validate_at(1_000).is_ok());
        assert_eq!(
            claim.validate_at(999),
            Err(DomainError::FutureTimestamp { timestamp: 1_000, now: 999 })
        );
    }

    #[test]
    fn test_derivations_do_not_touch_original() {
        let claim = sample();
        let scored = claim.with_confidence(ConfidenceScore::new(0.8).unwrap());
        let resolved = claim.resolved(ConfidenceScore::new(0.6).unwrap());

        assert!(claim.confidence.is_none());
        assert_eq!(scored.confidence_or(0.0), 0.8);
        assert_eq!(scored.source_type, SourceType::RouterLog);
        assert_eq!(resolved.source_type, SourceType::ConflictResolved);
        assert_eq!(resolved.id, claim.id);
    }

    #[test]
    fn test_age_hours() {
        let claim = sample();
        assert_eq!(claim.age_hours(1_000 + 7_200_000), 2.0);
        assert_eq!(claim.age_hours(0), 0.0);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ClaimId::generate(), ClaimId::generate());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "c-1");
        assert_eq!(json["source_type"], "ROUTER_LOG");
        assert!(json.get("confidence").is_none());
    }
}
