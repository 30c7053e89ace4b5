//! Depsight Scoring
//!
//! Implementations of the [`ScoringRuleEngine`](depsight_domain::ScoringRuleEngine)
//! strategy used by the claim processing stage.
//!
//! - [`SourceTableScorer`]: static per-source table, keeps adapter-supplied scores
//! - [`RuleBasedScorer`]: first matching rule of a versioned [`RuleSet`]
//!
//! Rule sets live in a [`RuleStore`], which persists them as TOML through an
//! atomic temp-file rename and hands out immutable snapshots, so scoring can
//! run concurrently with configuration updates.
//!
//! # Examples
//!
//! ```no_run
//! use depsight_scoring::{RuleBasedScorer, RuleStore};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RuleStore::open("rules.toml")?);
//! let scorer = RuleBasedScorer::new(store);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod rules;
mod store;
mod table;

pub use config::{RuleSet, ScoringRule, DEFAULT_RULE_SCORE, RULE_SET_VERSION};
pub use error::ScoringError;
pub use rules::RuleBasedScorer;
pub use store::{load_rule_set, RuleStore};
pub use table::{default_source_score, SourceTableScorer, UNKNOWN_SOURCE_SCORE};
