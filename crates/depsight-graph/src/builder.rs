//! Graph assembly from inferred dependencies

use crate::{DependencyEdge, DependencyGraph};
use depsight_domain::Dependency;
use tracing::debug;

/// Assembles a [`DependencyGraph`] from a list of dependencies
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyGraphBuilder;

impl DependencyGraphBuilder {
    /// Create a builder
    pub fn new() -> Self {
        Self
    }

    /// Build the adjacency structure
    ///
    /// Both endpoints of every dependency become nodes. Repeated
    /// `(source, target, type)` entries collapse into one edge carrying the
    /// highest confidence.
    pub fn build_graph(&self, dependencies: &[Dependency]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        let mut collapsed = 0;

        for dependency in dependencies {
            let edge = DependencyEdge {
                target: dependency.target_app_id.clone(),
                dependency_type: dependency.dependency_type,
                confidence: dependency.confidence,
            };
            if !graph.insert_edge(&dependency.source_app_id, edge) {
                collapsed += 1;
            }
        }

        debug!(
            "Built dependency graph: {} nodes, {} edges ({} duplicate edges collapsed)",
            graph.node_count(),
            graph.edge_count(),
            collapsed
        );
        graph
    }
}
