//! Dependency graph and its analyses

use crate::GraphError;
use depsight_domain::{ConfidenceScore, DependencyType};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Outgoing edge of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyEdge {
    /// Node depended upon
    pub target: String,

    /// Kind of dependency
    #[serde(rename = "type")]
    pub dependency_type: DependencyType,

    /// Trust in the dependency
    pub confidence: ConfidenceScore,
}

/// Aggregate numbers describing a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphStatistics {
    /// Nodes, including isolated endpoints
    pub node_count: usize,

    /// Directed edges
    pub edge_count: usize,

    /// Cycles reported by [`DependencyGraph::detect_cycles`]
    pub cycle_count: usize,

    /// Connected components with edge direction ignored
    pub component_count: usize,
}

/// Directed graph of applications keyed by node name
///
/// Every node observed as a source or a target is present, possibly with no
/// outgoing edges. At most one edge exists per `(source, target, type)`.
/// Node iteration is in name order, which makes every analysis deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyGraph {
    adjacency: BTreeMap<String, Vec<DependencyEdge>>,
}

impl DependencyGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ensure_node(&mut self, node: &str) {
        if !self.adjacency.contains_key(node) {
            self.adjacency.insert(node.to_string(), Vec::new());
        }
    }

    /// Insert an edge, keeping the higher confidence for a repeated
    /// `(source, target, type)`. Returns whether a new edge was added.
    pub(crate) fn insert_edge(&mut self, source: &str, edge: DependencyEdge) -> bool {
        self.ensure_node(source);
        self.ensure_node(&edge.target);

        let edges = self.adjacency.entry(source.to_string()).or_default();
        if let Some(existing) = edges
            .iter_mut()
            .find(|e| e.target == edge.target && e.dependency_type == edge.dependency_type)
        {
            if edge.confidence > existing.confidence {
                existing.confidence = edge.confidence;
            }
            return false;
        }
        edges.push(edge);
        true
    }

    /// Node names in order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// All edges as `(source, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &DependencyEdge)> {
        self.adjacency
            .iter()
            .flat_map(|(source, edges)| edges.iter().map(move |edge| (source.as_str(), edge)))
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether `node` is in the graph
    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Outgoing edges of `node`; empty for unknown nodes
    pub fn dependencies(&self, node: &str) -> &[DependencyEdge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes with at least one edge into `node`
    ///
    /// Scans every adjacency list.
    pub fn dependents(&self, node: &str) -> Vec<&str> {
        self.adjacency
            .iter()
            .filter(|(_, edges)| edges.iter().any(|edge| edge.target == node))
            .map(|(source, _)| source.as_str())
            .collect()
    }

    /// Find cycles with a depth-first search
    ///
    /// When the search reaches a node still on the search stack, the path
    /// from that node to the current one is reported, closed by repeating the
    /// first node: `A -> B -> C -> A` yields `["A", "B", "C", "A"]`. A
    /// self-loop yields `["A", "A"]`.
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut search = CycleSearch {
            graph: self,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        };

        for node in self.nodes() {
            if !search.visited.contains(node) {
                search.visit(node);
            }
        }
        search.cycles
    }

    /// Whether any cycle exists
    pub fn has_cycles(&self) -> bool {
        !self.detect_cycles().is_empty()
    }

    /// Linear order in which every edge's source precedes its target
    ///
    /// Kahn's algorithm over in-degrees. Fails with
    /// [`GraphError::CycleDetected`] if the graph has any cycle; callers are
    /// expected to check [`DependencyGraph::detect_cycles`] first.
    pub fn topological_order(&self) -> Result<Vec<String>, GraphError> {
        let cycle_count = self.detect_cycles().len();
        if cycle_count > 0 {
            return Err(GraphError::CycleDetected { cycle_count });
        }

        let mut in_degree: HashMap<&str, usize> = self.nodes().map(|n| (n, 0)).collect();
        for (_, edge) in self.edges() {
            *in_degree.entry(edge.target.as_str()).or_insert(0) += 1;
        }

        let mut queue: VecDeque<&str> = self
            .nodes()
            .filter(|node| in_degree.get(node).copied() == Some(0))
            .collect();
        let mut order = Vec::with_capacity(self.node_count());

        while let Some(node) = queue.pop_front() {
            order.push(node.to_string());
            for edge in self.dependencies(node) {
                if let Some(degree) = in_degree.get_mut(edge.target.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(edge.target.as_str());
                    }
                }
            }
        }

        Ok(order)
    }

    /// Fewest-hop path from `source` to `target`, both included
    ///
    /// Returns `[source]` when they are equal, and an empty path when either
    /// node is missing or `target` is unreachable.
    pub fn shortest_path(&self, source: &str, target: &str) -> Vec<String> {
        if !self.contains(source) || !self.contains(target) {
            return Vec::new();
        }
        if source == target {
            return vec![source.to_string()];
        }

        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::from([source]);
        let mut queue = VecDeque::from([source]);

        while let Some(node) = queue.pop_front() {
            for edge in self.dependencies(node) {
                let next = edge.target.as_str();
                if !seen.insert(next) {
                    continue;
                }
                previous.insert(next, node);
                if next == target {
                    return rebuild_path(&previous, source, target);
                }
                queue.push_back(next);
            }
        }

        Vec::new()
    }

    /// Graph restricted to `nodes`
    ///
    /// Nodes outside the graph are ignored; edges leaving the set are dropped.
    pub fn extract_subgraph<I, S>(&self, nodes: I) -> DependencyGraph
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keep: BTreeSet<String> = nodes
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| self.contains(n))
            .collect();

        let adjacency = keep
            .iter()
            .map(|node| {
                let edges = self
                    .dependencies(node)
                    .iter()
                    .filter(|edge| keep.contains(&edge.target))
                    .cloned()
                    .collect();
                (node.clone(), edges)
            })
            .collect();

        DependencyGraph { adjacency }
    }

    /// Number of weakly connected components
    pub fn component_count(&self) -> usize {
        let mut undirected: HashMap<&str, Vec<&str>> = HashMap::new();
        for (source, edge) in self.edges() {
            undirected.entry(source).or_default().push(edge.target.as_str());
            undirected.entry(edge.target.as_str()).or_default().push(source);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = 0;
        for node in self.nodes() {
            if !visited.insert(node) {
                continue;
            }
            components += 1;
            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                for &neighbour in undirected.get(current).into_iter().flatten() {
                    if visited.insert(neighbour) {
                        stack.push(neighbour);
                    }
                }
            }
        }
        components
    }

    /// Node, edge, cycle and component counts
    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            cycle_count: self.detect_cycles().len(),
            component_count: self.component_count(),
        }
    }
}

struct CycleSearch<'g> {
    graph: &'g DependencyGraph,
    visited: HashSet<&'g str>,
    on_stack: HashSet<&'g str>,
    path: Vec<&'g str>,
    cycles: Vec<Vec<String>>,
}

impl<'g> CycleSearch<'g> {
    /// Depth-first search from `root` with an explicit frame stack of
    /// `(node, next edge index)`, so path length is bounded by memory only.
    fn visit(&mut self, root: &'g str) {
        let graph = self.graph;
        self.enter(root);
        let mut frames: Vec<(&'g str, usize)> = vec![(root, 0)];

        while let Some(frame) = frames.last_mut() {
            let (node, index) = *frame;
            let Some(edge) = graph.dependencies(node).get(index) else {
                frames.pop();
                self.path.pop();
                self.on_stack.remove(node);
                continue;
            };
            frame.1 += 1;

            let next = edge.target.as_str();
            if self.on_stack.contains(next) {
                if let Some(start) = self.path.iter().position(|n| *n == next) {
                    let mut cycle: Vec<String> =
                        self.path[start..].iter().map(|n| n.to_string()).collect();
                    cycle.push(next.to_string());
                    self.cycles.push(cycle);
                }
            } else if !self.visited.contains(next) {
                self.enter(next);
                frames.push((next, 0));
            }
        }
    }

    fn enter(&mut self, node: &'g str) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);
    }
}

fn rebuild_path(previous: &HashMap<&str, &str>, source: &str, target: &str) -> Vec<String> {
    let mut path = vec![target.to_string()];
    let mut current = target;
    while current != source {
        match previous.get(current) {
            Some(&prev) => {
                path.push(prev.to_string());
                current = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}
