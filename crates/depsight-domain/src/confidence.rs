//! Confidence score module

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounded trust value in `[0.0, 1.0]`
///
/// Construction through [`ConfidenceScore::new`] rejects anything outside the
/// range (including NaN). Stages that must never fail on a bad score use
/// [`ConfidenceScore::clamped`] instead.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Lowest possible score
    pub const MIN: ConfidenceScore = ConfidenceScore(0.0);

    /// Highest possible score
    pub const MAX: ConfidenceScore = ConfidenceScore(1.0);

    /// Create a score, failing if `value` is outside `[0.0, 1.0]`
    ///
    /// # Examples
    ///
    /// ```
    /// use depsight_domain::ConfidenceScore;
    ///
    /// assert!(ConfidenceScore::new(0.75).is_ok());
    /// assert!(ConfidenceScore::new(1.5).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::ConfidenceOutOfRange(value))
        }
    }

    /// Create a score by clamping `value` into `[0.0, 1.0]`
    ///
    /// NaN maps to 0.0.
    pub fn clamped(value: f64) -> Self {
        Self::clamped_between(value, 0.0, 1.0)
    }

    /// Clamp `value` into `[lower, upper]`, itself a sub-range of `[0.0, 1.0]`
    pub fn clamped_between(value: f64, lower: f64, upper: f64) -> Self {
        let lower = lower.clamp(0.0, 1.0);
        let upper = upper.clamp(lower, 1.0);
        if value.is_nan() {
            return Self(lower);
        }
        Self(value.clamp(lower, upper))
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
