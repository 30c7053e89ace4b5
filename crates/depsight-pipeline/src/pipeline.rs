//! End-to-end orchestration of the stages

use crate::config::PipelineConfig;
use crate::inference::{InferenceEngine, InferenceOutcome};
use crate::processing::{ClaimProcessingEngine, ProcessingOutcome};
use crate::resolution::{ConflictResolutionEngine, ResolutionOutcome};
use crate::PipelineError;
use depsight_domain::{current_timestamp_millis, Claim, Dependency, InferenceHook, ScoringRuleEngine};
use depsight_graph::{DependencyGraph, DependencyGraphBuilder, GraphStatistics};
use depsight_scoring::SourceTableScorer;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Everything one run produced, stage by stage
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Scored claims and exclusions
    pub processing: ProcessingOutcome,
    /// Resolved claims and conflict records
    pub resolution: ResolutionOutcome,
    /// Accepted dependencies and drops
    pub inference: InferenceOutcome,
    /// Accepted dependencies, same as `inference.dependencies`
    pub dependencies: Vec<Dependency>,
    /// Graph built from the accepted dependencies
    pub graph: DependencyGraph,
    /// Aggregate numbers for `graph`
    pub statistics: GraphStatistics,
}

/// Raw claims in, dependency graph out
///
/// # Examples
///
/// ```
/// use depsight_domain::{Claim, ConfidenceScore, DependencyType, SourceType};
/// use depsight_pipeline::DependencyPipeline;
///
/// let now = 1_700_000_000_000;
/// let claim = Claim::new(
///     "c-1",
///     SourceType::Codebase,
///     "build.gradle: implementation project(':user-service')",
///     "order-service -> user-service",
///     now,
/// )
/// .unwrap()
/// .with_confidence(ConfidenceScore::new(0.95).unwrap());
///
/// let output = DependencyPipeline::with_defaults().run_at(&[claim], now);
/// assert_eq!(output.dependencies.len(), 1);
/// assert_eq!(output.dependencies[0].dependency_type, DependencyType::Build);
/// assert_eq!(output.statistics.node_count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyPipeline {
    processing: ClaimProcessingEngine,
    resolution: ConflictResolutionEngine,
    inference: InferenceEngine,
    builder: DependencyGraphBuilder,
}

impl DependencyPipeline {
    /// Create a pipeline around a scorer and a validated configuration
    pub fn new<S: ScoringRuleEngine + 'static>(
        scorer: S,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        Self::from_shared(Arc::new(scorer), config)
    }

    /// Create a pipeline around an already shared scorer
    pub fn from_shared(
        scorer: Arc<dyn ScoringRuleEngine>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            processing: ClaimProcessingEngine::from_shared(scorer),
            resolution: ConflictResolutionEngine::new(config.clone())?,
            inference: InferenceEngine::new(config)?,
            builder: DependencyGraphBuilder::new(),
        })
    }

    /// Static source-table scoring and default thresholds
    pub fn with_defaults() -> Self {
        Self {
            processing: ClaimProcessingEngine::new(SourceTableScorer::new()),
            resolution: ConflictResolutionEngine::default(),
            inference: InferenceEngine::default(),
            builder: DependencyGraphBuilder::new(),
        }
    }

    /// Register an additional inference hook
    pub fn with_hook<H: InferenceHook + 'static>(mut self, hook: H) -> Self {
        self.inference = self.inference.with_hook(hook);
        self
    }

    /// Run every stage against the current time
    pub fn run(&self, claims: &[Claim]) -> PipelineOutput {
        self.run_at(claims, current_timestamp_millis())
    }

    /// Run every stage, measuring time against `now` (ms since epoch)
    pub fn run_at(&self, claims: &[Claim], now: u64) -> PipelineOutput {
        let processing = self.processing.process_batch_at(claims, now);
        let resolution = self.resolution.resolve_batch_at(&processing.claims, now);
        let inference = self.inference.infer_batch_at(&resolution.claims, now);

        let dependencies = inference.dependencies.clone();
        let graph = self.builder.build_graph(&dependencies);
        let statistics = graph.statistics();

        info!(
            "Pipeline run: {} claims in, {} dependencies out, {} nodes, {} cycles",
            claims.len(),
            dependencies.len(),
            statistics.node_count,
            statistics.cycle_count
        );

        PipelineOutput {
            processing,
            resolution,
            inference,
            dependencies,
            graph,
            statistics,
        }
    }
}

impl Default for DependencyPipeline {
    fn default() -> Self {
        Self::with_defaults()
    }
}
