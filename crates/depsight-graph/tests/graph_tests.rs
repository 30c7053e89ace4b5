//! Integration tests for depsight-graph
//!
//! These tests exercise every graph analysis over small hand-built graphs.

use depsight_domain::{ConfidenceScore, Dependency, DependencyType};
use depsight_graph::{DependencyGraph, DependencyGraphBuilder, GraphError, GraphStatistics};
use proptest::prelude::*;

fn dep(source: &str, target: &str) -> Dependency {
    Dependency::new(
        source,
        target,
        DependencyType::Runtime,
        ConfidenceScore::new(0.8).unwrap(),
    )
    .unwrap()
}

fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
    let deps: Vec<Dependency> = edges.iter().map(|(s, t)| dep(s, t)).collect();
    DependencyGraphBuilder::new().build_graph(&deps)
}

fn assert_respects_edges(graph: &DependencyGraph, order: &[String]) {
    assert_eq!(order.len(), graph.node_count());
    let index = |node: &str| order.iter().position(|n| n == node).unwrap();
    for (source, edge) in graph.edges() {
        assert!(
            index(source) < index(&edge.target),
            "{} must precede {}",
            source,
            edge.target
        );
    }
}

#[test]
fn test_three_node_cycle_detected_once() {
    let g = graph(&[("a", "b"), ("b", "c"), ("c", "a")]);
    let cycles = g.detect_cycles();

    assert_eq!(cycles.len(), 1);
    let cycle = &cycles[0];
    for node in ["a", "b", "c"] {
        assert!(cycle.iter().any(|n| n == node), "cycle should contain {node}");
    }
    assert_eq!(cycle.first(), cycle.last(), "cycle should be closed");
}

#[test]
fn test_self_loop_is_a_cycle() {
    let g = graph(&[("a", "a"), ("a", "b")]);
    assert_eq!(g.detect_cycles(), vec![vec!["a".to_string(), "a".to_string()]]);
    assert!(g.has_cycles());
}

#[test]
fn test_acyclic_graph_has_no_cycles() {
    let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
    assert!(g.detect_cycles().is_empty());
}

#[test]
fn test_topological_order_respects_edges() {
    let g = graph(&[
        ("web-app", "order-service"),
        ("web-app", "user-service"),
        ("order-service", "user-service"),
        ("order-service", "orders-db"),
        ("user-service", "users-db"),
    ]);
    let order = g.topological_order().unwrap();
    assert_respects_edges(&g, &order);
}

#[test]
fn test_topological_order_refused_for_cycles() {
    let g = graph(&[("a", "b"), ("b", "a"), ("c", "c")]);
    assert_eq!(
        g.topological_order(),
        Err(GraphError::CycleDetected { cycle_count: 2 })
    );
}

#[test]
fn test_dependencies_and_dependents() {
    let g = graph(&[("web-app", "api"), ("worker", "api"), ("api", "db")]);

    let targets: Vec<&str> = g.dependencies("api").iter().map(|e| e.target.as_str()).collect();
    assert_eq!(targets, ["db"]);
    assert_eq!(g.dependents("api"), ["web-app", "worker"]);
    assert!(g.dependencies("unknown").is_empty());
    assert!(g.dependents("unknown").is_empty());
}

#[test]
fn test_shortest_path() {
    let g = graph(&[("a", "b"), ("b", "c"), ("c", "d"), ("a", "d"), ("x", "y")]);

    assert_eq!(g.shortest_path("a", "d"), ["a", "d"]);
    assert_eq!(g.shortest_path("b", "d"), ["b", "c", "d"]);
    assert_eq!(g.shortest_path("a", "a"), ["a"]);
    assert!(g.shortest_path("d", "a").is_empty(), "edges are directed");
    assert!(g.shortest_path("a", "y").is_empty(), "unreachable");
    assert!(g.shortest_path("a", "zzz").is_empty(), "absent target");
    assert!(g.shortest_path("zzz", "zzz").is_empty(), "absent node");
}

#[test]
fn test_extract_subgraph_drops_outside_edges() {
    let g = graph(&[("a", "b"), ("b", "c"), ("c", "a"), ("a", "d")]);
    let sub = g.extract_subgraph(["a", "b", "missing"]);

    assert_eq!(sub.nodes().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(sub.edge_count(), 1);
    assert_eq!(sub.dependencies("a")[0].target, "b");
    assert!(sub.detect_cycles().is_empty());
}

#[test]
fn test_statistics() {
    let g = graph(&[("a", "b"), ("b", "a"), ("c", "d"), ("e", "d")]);
    assert_eq!(
        g.statistics(),
        GraphStatistics {
            node_count: 5,
            edge_count: 4,
            cycle_count: 1,
            component_count: 2,
        }
    );
}

#[test]
fn test_components_ignore_direction() {
    // c and e only meet through d's incoming edges
    let g = graph(&[("c", "d"), ("e", "d"), ("f", "f")]);
    assert_eq!(g.component_count(), 2);
}

#[test]
fn test_statistics_serialize() {
    let g = graph(&[("a", "b")]);
    let json = serde_json::to_value(g.statistics()).unwrap();
    assert_eq!(json["node_count"], 2);
    assert_eq!(json["component_count"], 1);
}

fn chain(len: usize) -> Vec<Dependency> {
    (0..len)
        .map(|i| dep(&format!("n{:06}", i), &format!("n{:06}", i + 1)))
        .collect()
}

#[test]
fn test_long_chain_statistics() {
    let g = DependencyGraphBuilder::new().build_graph(&chain(100_000));
    assert_eq!(
        g.statistics(),
        GraphStatistics {
            node_count: 100_001,
            edge_count: 100_000,
            cycle_count: 0,
            component_count: 1,
        }
    );

    let order = g.topological_order().unwrap();
    assert_eq!(order.first().map(String::as_str), Some("n000000"));
    assert_eq!(order.last().map(String::as_str), Some("n100000"));
}

#[test]
fn test_long_ring_is_one_cycle() {
    let mut deps = chain(100_000);
    deps.push(dep("n100000", "n000000"));
    let g = DependencyGraphBuilder::new().build_graph(&deps);

    let cycles = g.detect_cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), 100_002);
    assert_eq!(cycles[0].first(), cycles[0].last());
}

proptest! {
    /// Property: any DAG (edges only from lower to higher index) yields a
    /// complete order consistent with every edge
    #[test]
    fn test_topological_order_on_random_dags(
        raw_edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40)
    ) {
        let edges: Vec<(String, String)> = raw_edges
            .into_iter()
            .filter(|(a, b)| a < b)
            .map(|(a, b)| (format!("n{a:02}"), format!("n{b:02}")))
            .collect();
        let deps: Vec<Dependency> = edges.iter().map(|(s, t)| dep(s, t)).collect();
        let g = DependencyGraphBuilder::new().build_graph(&deps);

        prop_assert!(g.detect_cycles().is_empty());
        let order = g.topological_order().unwrap();
        prop_assert_eq!(order.len(), g.node_count());
        for (source, edge) in g.edges() {
            let s = order.iter().position(|n| n == source).unwrap();
            let t = order.iter().position(|n| *n == edge.target).unwrap();
            prop_assert!(s < t);
        }
    }

    /// Property: a graph with a back edge always refuses a topological order
    #[test]
    fn test_cyclic_graphs_always_refused(len in 1usize..8) {
        let mut edges: Vec<(String, String)> = (0..len)
            .map(|i| (format!("n{i}"), format!("n{}", i + 1)))
            .collect();
        edges.push((format!("n{len}"), "n0".to_string()));
        let deps: Vec<Dependency> = edges.iter().map(|(s, t)| dep(s, t)).collect();
        let g = DependencyGraphBuilder::new().build_graph(&deps);

        prop_assert!(!g.detect_cycles().is_empty());
        prop_assert!(
            matches!(g.topological_order(), Err(GraphError::CycleDetected { .. })),
            "cyclic graph must be refused"
        );
    }
}
