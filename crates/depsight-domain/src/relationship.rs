//! Relationship key - the identity that groups claims about the same edge

use crate::{Claim, ClaimId, DomainError};
use std::fmt;

/// Separator of the `source -> target` convention
pub const RELATIONSHIP_ARROW: &str = "->";

/// Grouping key for claims
///
/// Claims whose processed data follows the `source -> target` convention share
/// an [`RelationshipKey::Edge`] key (trimmed, lower-cased). Every other claim
/// falls back to its own id, so it never merges with anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RelationshipKey {
    /// Normalized `source -> target` text
    Edge(String),

    /// Fallback for claims outside the convention
    Claim(ClaimId),
}

impl RelationshipKey {
    /// Derive the key for a claim
    ///
    /// # Examples
    ///
    /// ```
    /// use depsight_domain::{Claim, RelationshipKey, SourceType};
    ///
    /// let claim = Claim::new("c-1", SourceType::Codebase, "raw", "  Web-App -> API ", 0).unwrap();
    /// assert_eq!(RelationshipKey::from_claim(&claim).as_str(), "web-app -> api");
    /// ```
    pub fn from_claim(claim: &Claim) -> Self {
        if claim.processed_data.contains(RELATIONSHIP_ARROW) {
            RelationshipKey::Edge(claim.processed_data.trim().to_lowercase())
        } else {
            RelationshipKey::Claim(claim.id.clone())
        }
    }

    /// Text form of the key
    pub fn as_str(&self) -> &str {
        match self {
            RelationshipKey::Edge(key) => key,
            RelationshipKey::Claim(id) => id.as_str(),
        }
    }

    /// Whether the key came from the `source -> target` convention
    pub fn is_edge(&self) -> bool {
        matches!(self, RelationshipKey::Edge(_))
    }

    /// Split into `(source, target)`
    ///
    /// Fails unless the key splits on the arrow into exactly two non-empty parts.
    pub fn endpoints(&self) -> Result<(String, String), DomainError> {
        let RelationshipKey::Edge(key) = self else {
            return Err(DomainError::MalformedKey(self.as_str().to_string()));
        };

        let parts: Vec<&str> = key.split(RELATIONSHIP_ARROW).map(str::trim).collect();
        match parts.as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => {
                Ok((source.to_string(), target.to_string()))
            }
            _ => Err(DomainError::MalformedKey(key.clone())),
        }
    }
}

impl fmt::Display for RelationshipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
