//! Depsight Graph
//!
//! Directed dependency graph assembled from inferred dependencies, with the
//! analyses the orchestration layer needs:
//!
//! - forward / reverse lookup of dependencies
//! - cycle detection (DFS with a recursion stack)
//! - topological ordering (Kahn's algorithm), refused for cyclic graphs
//! - unweighted shortest path (BFS)
//! - subgraph extraction
//! - aggregate statistics, including weakly connected components
//!
//! A graph is built fresh per request and never mutated afterwards.
//!
//! # Examples
//!
//! ```
//! use depsight_domain::{ConfidenceScore, Dependency, DependencyType};
//! use depsight_graph::DependencyGraphBuilder;
//!
//! let score = ConfidenceScore::new(0.9).unwrap();
//! let deps = vec![
//!     Dependency::new("web-app", "order-service", DependencyType::Api, score).unwrap(),
//!     Dependency::new("order-service", "orders-db", DependencyType::Database, score).unwrap(),
//! ];
//!
//! let graph = DependencyGraphBuilder::new().build_graph(&deps);
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.topological_order().unwrap(), ["web-app", "order-service", "orders-db"]);
//! assert_eq!(graph.shortest_path("web-app", "orders-db").len(), 3);
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
mod graph;

pub use builder::DependencyGraphBuilder;
pub use error::GraphError;
pub use graph::{DependencyEdge, DependencyGraph, GraphStatistics};
