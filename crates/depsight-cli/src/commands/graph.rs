//! Graph command implementation.

use crate::cli::{GraphAction, GraphArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use depsight_graph::DependencyGraph;

/// Execute the graph command.
pub fn execute_graph(args: GraphArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let output = super::run_pipeline(&args.input, config)?;
    println!("{}", render(&args.action, &output.graph, formatter)?);
    Ok(())
}

fn render(action: &GraphAction, graph: &DependencyGraph, formatter: &Formatter) -> Result<String> {
    match action {
        GraphAction::Stats => formatter.format_statistics(&graph.statistics()),
        GraphAction::Cycles => formatter.format_cycles(&graph.detect_cycles()),
        GraphAction::Order => {
            let order = graph.topological_order()?;
            formatter.format_sequence(&order, "Graph is empty.")
        }
        GraphAction::Path { from, to } => {
            let path = graph.shortest_path(from, to);
            formatter.format_sequence(&path, &format!("No path from {} to {}", from, to))
        }
        GraphAction::Node { name } => formatter.format_node(graph, name),
        GraphAction::Subgraph { nodes } => formatter.format_graph(&graph.extract_subgraph(nodes)),
    }
}
