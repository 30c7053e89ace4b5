//! Claim input parsing.
//!
//! Claims arrive as a JSON array:
//!
//! ```json
//! [
//!   {
//!     "id": "r-17",
//!     "source_type": "ROUTER_LOG",
//!     "raw_data": "GET /api/users 200",
//!     "processed_data": "web-app -> user-service",
//!     "timestamp": 1700000000000,
//!     "confidence": 0.7
//!   }
//! ]
//! ```
//!
//! `id`, `timestamp` and `confidence` are optional. Blank fields are passed
//! through so the pipeline can report them per claim.

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use depsight_domain::{current_timestamp_millis, Claim, ClaimId, ConfidenceScore, SourceType};
use serde::Deserialize;
use tracing::error;
use std::fs;
use std::io::{self, Read};

/// One claim as written in the input file.
#[derive(Debug, Deserialize)]
struct ClaimRecord {
    #[serde(default)]
    id: Option<String>,
    source_type: String,
    #[serde(default)]
    raw_data: String,
    #[serde(default)]
    processed_data: String,
    #[serde(default)]
    timestamp: Option<u64>,
    #[serde(default)]
    confidence: Option<f64>,
}

impl ClaimRecord {
    fn into_claim(self, now: u64) -> Result<Claim> {
        let id = match self.id {
            Some(id) => ClaimId::new(id),
            None => ClaimId::generate(),
        };
        let confidence = self
            .confidence
            .map(ConfidenceScore::new)
            .transpose()
            .inspect_err(|_| error!("Claim {} carries an out-of-range confidence", id))?;

        Ok(Claim {
            id,
            source_type: SourceType::parse(&self.source_type),
            raw_data: self.raw_data,
            processed_data: self.processed_data,
            timestamp: self.timestamp.unwrap_or(now),
            confidence,
        })
    }
}

/// Reference time for a run.
pub fn reference_time(args: &InputArgs) -> u64 {
    args.now.unwrap_or_else(current_timestamp_millis)
}

/// Read claims from the file or stdin named by `args`.
pub fn read_claims(args: &InputArgs) -> Result<Vec<Claim>> {
    let json_data = if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(file_path) = &args.file {
        fs::read_to_string(file_path)?
    } else {
        return Err(CliError::InvalidInput(
            "Must specify either --input or --stdin".to_string(),
        ));
    };

    parse_claims(&json_data, reference_time(args))
}

/// Parse a JSON array of claim records.
pub fn parse_claims(json_data: &str, now: u64) -> Result<Vec<Claim>> {
    let records: Vec<ClaimRecord> = serde_json::from_str(json_data)?;
    if records.is_empty() {
        return Err(CliError::InvalidInput("No claims provided".to_string()));
    }
    records.into_iter().map(|r| r.into_claim(now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsight_domain::DomainError;

    #[test]
    fn test_parse_full_record() {
        let claims = parse_claims(
            r#"[{"id": "r-1", "source_type": "router_log", "raw_data": "GET /api/users",
                 "processed_data": "web-app -> user-service", "timestamp": 42, "confidence": 0.7}]"#,
            1_000,
        )
        .unwrap();

        assert_eq!(claims.len(), 1);
        let claim = &claims[0];
        assert_eq!(claim.id.as_str(), "r-1");
        assert_eq!(claim.source_type, SourceType::RouterLog);
        assert_eq!(claim.timestamp, 42);
        assert_eq!(claim.confidence.unwrap().value(), 0.7);
    }

    #[test]
    fn test_optional_fields() {
        let claims = parse_claims(
            r#"[{"source_type": "SNMP", "raw_data": "ifIndex=3", "processed_data": "a -> b"}]"#,
            1_000,
        )
        .unwrap();

        let claim = &claims[0];
        assert!(!claim.id.is_blank());
        assert_eq!(claim.timestamp, 1_000);
        assert!(claim.confidence.is_none());
        assert_eq!(claim.source_type, SourceType::parse("SNMP"));
    }

    #[test]
    fn test_blank_fields_reach_the_pipeline() {
        let claims = parse_claims(r#"[{"id": "c-1", "source_type": "CODEBASE"}]"#, 1_000).unwrap();
        assert!(claims[0].raw_data.is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(parse_claims("[]", 0), Err(CliError::InvalidInput(_))));
        assert!(matches!(parse_claims("{", 0), Err(CliError::Serialization(_))));
        assert!(matches!(
            parse_claims(
                r#"[{"id": "c-1", "source_type": "CODEBASE", "confidence": 1.5}]"#,
                0
            ),
            Err(CliError::Domain(DomainError::ConfidenceOutOfRange(_)))
        ));
    }
}
