//! Depsight CLI - Infer application dependencies from observed claims.

use anyhow::Context;
use clap::Parser;
use depsight_cli::commands;
use depsight_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Log to stderr so stdout stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(&cli).context("failed to resolve configuration")?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter)?,
        Command::Graph(args) => commands::execute_graph(args, &config, &formatter)?,
        Command::Rules(args) => commands::execute_rules(args, &config, &formatter)
            .with_context(|| format!("rule file {}", config.rules_path.display()))?,
    }

    Ok(())
}
