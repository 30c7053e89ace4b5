//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use depsight_domain::Dependency;
use depsight_graph::{DependencyGraph, GraphStatistics};
use depsight_pipeline::PipelineOutput;
use depsight_scoring::RuleSet;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a pipeline run.
    pub fn format_analysis(&self, output: &PipelineOutput, with_reports: bool) -> Result<String> {
        if self.format == CliFormat::Json {
            if with_reports {
                return self.json(&serde_json::json!({
                    "dependencies": output.dependencies,
                    "statistics": output.statistics,
                    "processing": output.processing.report,
                    "resolution": output.resolution.report,
                    "inference": output.inference.report,
                }));
            }
            return self.json(&serde_json::json!({
                "dependencies": output.dependencies,
                "statistics": output.statistics,
            }));
        }

        let mut sections = vec![
            self.format_dependencies(&output.dependencies)?,
            self.format_statistics(&output.statistics)?,
        ];

        if with_reports {
            sections.push(output.processing.report.summary());

            let resolution = &output.resolution.report;
            let mut lines = vec![format!(
                "Conflicts: {} ({} claims discarded, {} unkeyed claims)",
                resolution.conflicts.len(),
                resolution.discarded(),
                resolution.unkeyed
            )];
            for conflict in &resolution.conflicts {
                lines.push(format!(
                    "  {}: {} wins with weight {:.3} over {} contenders",
                    conflict.key,
                    conflict.winner_id,
                    conflict.winner_weight,
                    conflict.contenders.len() - 1
                ));
            }
            sections.push(lines.join("\n"));

            let inference = &output.inference.report;
            let mut lines = vec![format!(
                "Inference: {} groups, {} skipped, {} below threshold, {} duplicates collapsed",
                inference.groups,
                inference.skipped_keys.len(),
                inference.below_threshold.len(),
                inference.duplicates_collapsed
            )];
            for skipped in &inference.skipped_keys {
                lines.push(self.warning(&format!("{}: {}", skipped.key, skipped.reason)));
            }
            sections.push(lines.join("\n"));
        }

        if output.statistics.cycle_count > 0 {
            sections.push(self.warning(&format!(
                "{} cycle(s) detected; run 'depsight graph cycles' for details",
                output.statistics.cycle_count
            )));
        }

        Ok(sections.join("\n\n"))
    }

    /// Format dependencies.
    pub fn format_dependencies(&self, dependencies: &[Dependency]) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(&dependencies);
        }
        if dependencies.is_empty() {
            return Ok(self.colorize("No dependencies inferred.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Target", "Type", "Confidence"]);
        for dependency in dependencies {
            builder.push_record([
                dependency.source_app_id.clone(),
                dependency.target_app_id.clone(),
                dependency.dependency_type.to_string(),
                format!("{:.3}", dependency.confidence.value()),
            ]);
        }
        Ok(self.table(builder))
    }

    /// Format graph statistics.
    pub fn format_statistics(&self, statistics: &GraphStatistics) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(statistics);
        }
        let mut builder = Builder::default();
        builder.push_record(["Nodes", "Edges", "Cycles", "Components"]);
        builder.push_record([
            statistics.node_count.to_string(),
            statistics.edge_count.to_string(),
            statistics.cycle_count.to_string(),
            statistics.component_count.to_string(),
        ]);
        Ok(self.table(builder))
    }

    /// Format detected cycles.
    pub fn format_cycles(&self, cycles: &[Vec<String>]) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(&cycles);
        }
        if cycles.is_empty() {
            return Ok(self.success("No cycles detected"));
        }
        let lines: Vec<String> = cycles
            .iter()
            .enumerate()
            .map(|(i, cycle)| format!("{:>3}. {}", i + 1, cycle.join(" -> ")))
            .collect();
        Ok(lines.join("\n"))
    }

    /// Format an ordered node sequence (topological order or path).
    pub fn format_sequence(&self, nodes: &[String], empty_message: &str) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(&nodes);
        }
        if nodes.is_empty() {
            return Ok(self.colorize(empty_message, "yellow"));
        }
        Ok(nodes.join(" -> "))
    }

    /// Format the neighbourhood of one node.
    pub fn format_node(&self, graph: &DependencyGraph, name: &str) -> Result<String> {
        let dependencies: Vec<&str> = graph
            .dependencies(name)
            .iter()
            .map(|edge| edge.target.as_str())
            .collect();
        let dependents = graph.dependents(name);

        if self.format == CliFormat::Json {
            return self.json(&serde_json::json!({
                "node": name,
                "present": graph.contains(name),
                "dependencies": graph.dependencies(name),
                "dependents": dependents,
            }));
        }
        if !graph.contains(name) {
            return Ok(self.warning(&format!("Node '{}' is not in the graph", name)));
        }

        Ok([
            self.colorize(name, "cyan"),
            format!("  depends on:    {}", list_or_none(&dependencies)),
            format!("  depended on by: {}", list_or_none(&dependents)),
        ]
        .join("\n"))
    }

    /// Format every edge of a graph.
    pub fn format_graph(&self, graph: &DependencyGraph) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(graph);
        }
        if graph.node_count() == 0 {
            return Ok(self.colorize("Graph is empty.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Target", "Type", "Confidence"]);
        for (source, edge) in graph.edges() {
            builder.push_record([
                source.to_string(),
                edge.target.clone(),
                edge.dependency_type.to_string(),
                format!("{:.3}", edge.confidence.value()),
            ]);
        }
        let isolated: Vec<&str> = graph
            .nodes()
            .filter(|node| graph.dependencies(node).is_empty() && graph.dependents(node).is_empty())
            .collect();

        let mut output = self.table(builder);
        if !isolated.is_empty() {
            output.push_str(&format!("\nIsolated nodes: {}", isolated.join(", ")));
        }
        Ok(output)
    }

    /// Format a scoring rule set.
    pub fn format_rules(&self, rules: &RuleSet) -> Result<String> {
        if self.format == CliFormat::Json {
            return self.json(rules);
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Enabled", "Priority", "Source", "Contains", "Score"]);
        for rule in &rules.rules {
            builder.push_record([
                rule.name.clone(),
                rule.enabled.to_string(),
                rule.priority.to_string(),
                rule.source_type
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "*".to_string()),
                rule.contains.clone().unwrap_or_else(|| "*".to_string()),
                format!("{:.2}", rule.score),
            ]);
        }

        Ok(format!(
            "{}\nVersion {} - default score {:.2}",
            self.table(builder),
            rules.version,
            rules.default_score
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn list_or_none(nodes: &[&str]) -> String {
    if nodes.is_empty() {
        "(none)".to_string()
    } else {
        nodes.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depsight_domain::{ConfidenceScore, DependencyType};
    use depsight_graph::DependencyGraphBuilder;

    fn dependencies() -> Vec<Dependency> {
        let score = ConfidenceScore::new(0.75).unwrap();
        vec![
            Dependency::new("web-app", "orders", DependencyType::Api, score).unwrap(),
            Dependency::new("orders", "orders-db", DependencyType::Database, score).unwrap(),
        ]
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_dependencies(&dependencies()).unwrap();
        assert!(output.contains("Source"));
        assert!(output.contains("orders-db"));
        assert!(output.contains("DATABASE"));
        assert!(output.contains("0.750"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(CliFormat::Json, false);
        let output = formatter.format_dependencies(&dependencies()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["type"], "DATABASE");
        assert_eq!(value[0]["source_app_id"], "web-app");
    }

    #[test]
    fn test_empty_dependencies() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_dependencies(&[]).unwrap();
        assert!(output.contains("No dependencies inferred"));
    }

    #[test]
    fn test_cycles_and_sequences() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let cycles = vec![vec!["a".to_string(), "b".to_string(), "a".to_string()]];
        assert!(formatter.format_cycles(&cycles).unwrap().contains("a -> b -> a"));
        assert_eq!(formatter.format_cycles(&[]).unwrap(), "✓ No cycles detected");
        assert_eq!(formatter.format_sequence(&[], "No path").unwrap(), "No path");
    }

    #[test]
    fn test_node_view() {
        let graph = DependencyGraphBuilder::new().build_graph(&dependencies());
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_node(&graph, "orders").unwrap();
        assert!(output.contains("depends on:    orders-db"));
        assert!(output.contains("depended on by: web-app"));
        assert!(formatter.format_node(&graph, "ghost").unwrap().contains("not in the graph"));
    }

    #[test]
    fn test_rules_table() {
        let formatter = Formatter::new(CliFormat::Table, false);
        let output = formatter.format_rules(&RuleSet::default()).unwrap();
        assert!(output.contains("source:codebase"));
        assert!(output.contains("Version 1"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(CliFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("boom"), "✗ boom");
    }
}
