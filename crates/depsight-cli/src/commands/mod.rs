//! Command implementations.

pub mod analyze;
pub mod graph;
pub mod rules;

pub use self::analyze::execute_analyze;
pub use self::graph::execute_graph;
pub use self::rules::execute_rules;

use crate::cli::InputArgs;
use crate::config::Config;
use crate::error::Result;
use crate::input::{read_claims, reference_time};
use depsight_domain::ScoringRuleEngine;
use depsight_pipeline::{DependencyPipeline, PipelineOutput};
use depsight_scoring::{RuleBasedScorer, RuleStore, SourceTableScorer};
use std::sync::Arc;
use tracing::debug;

/// Scorer for a run: the rule file, or the static table when asked.
pub fn build_scorer(config: &Config, table_scoring: bool) -> Result<Arc<dyn ScoringRuleEngine>> {
    if table_scoring {
        return Ok(Arc::new(SourceTableScorer::new()));
    }
    debug!("Loading scoring rules from {:?}", config.rules_path);
    let store = RuleStore::open(&config.rules_path)?;
    Ok(Arc::new(RuleBasedScorer::new(Arc::new(store))))
}

/// Read claims and run them through every pipeline stage.
pub fn run_pipeline(input: &InputArgs, config: &Config) -> Result<PipelineOutput> {
    let claims = read_claims(input)?;
    let scorer = build_scorer(config, input.table_scoring)?;
    let pipeline = DependencyPipeline::from_shared(scorer, config.pipeline.clone())?;
    Ok(pipeline.run_at(&claims, reference_time(input)))
}
