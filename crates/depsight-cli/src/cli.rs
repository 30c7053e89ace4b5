//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};

/// Depsight CLI - Infer application dependencies from observed claims.
#[derive(Debug, Parser)]
#[command(name = "depsight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, env = "DEPSIGHT_CONFIG")]
    pub config: Option<String>,

    /// Scoring rule file (TOML), defaults to ~/.depsight/rules.toml
    #[arg(short, long, global = true, env = "DEPSIGHT_RULES")]
    pub rules: Option<String>,

    /// Threshold preset applied when no configuration file is given
    #[arg(long, value_enum, global = true)]
    pub preset: Option<PresetArg>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// Threshold presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Built-in defaults
    Default,
    /// Shorter freshness window, higher acceptance bar
    Strict,
    /// Longer freshness window, lower acceptance bar
    Lenient,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline and list the inferred dependencies
    Analyze(AnalyzeArgs),

    /// Inspect the dependency graph built from a claim file
    Graph(GraphArgs),

    /// Manage scoring rules
    Rules(RulesArgs),
}

/// Where claims are read from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON file containing an array of claims
    #[arg(short = 'i', long = "input")]
    pub file: Option<String>,

    /// Read the JSON array of claims from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Reference time in ms since the Unix epoch (defaults to now)
    #[arg(long)]
    pub now: Option<u64>,

    /// Score with the static source table instead of the rule file
    #[arg(long)]
    pub table_scoring: bool,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the batch, conflict and inference reports
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the graph command.
#[derive(Debug, Args)]
pub struct GraphArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(subcommand)]
    pub action: GraphAction,
}

/// Graph inspection actions.
#[derive(Debug, Subcommand)]
pub enum GraphAction {
    /// Node, edge, cycle and component counts
    Stats,

    /// List every detected cycle
    Cycles,

    /// Topological order (fails on cyclic graphs)
    Order,

    /// Shortest path between two nodes
    Path {
        /// Start node
        from: String,
        /// End node
        to: String,
    },

    /// Forward and reverse dependencies of a node
    Node {
        /// Node name
        name: String,
    },

    /// Restrict the graph to the given nodes
    Subgraph {
        /// Nodes to keep
        #[arg(required = true)]
        nodes: Vec<String>,
    },
}

/// Arguments for rule management.
#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule management actions.
#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// Show the active rule set
    Show,

    /// Write the default rule set to the rule file
    Init {
        /// Overwrite an existing rule file
        #[arg(long)]
        force: bool,
    },

    /// Validate a rule file without installing it
    Check {
        /// Rule file to check
        path: String,
    },

    /// Validate a rule file and install it as the active rule set
    Install {
        /// Rule file to install
        path: String,
    },
}
