//! Rules command implementation.

use crate::cli::{RulesAction, RulesArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use depsight_scoring::{load_rule_set, RuleSet, RuleStore};
use std::path::Path;

/// Execute the rules command.
pub fn execute_rules(args: RulesArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let message = match args.action {
        RulesAction::Show => {
            let store = RuleStore::open(&config.rules_path)?;
            formatter.format_rules(&store.snapshot())?
        }
        RulesAction::Init { force } => {
            if config.rules_path.exists() && !force {
                return Err(CliError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    config.rules_path.display()
                )));
            }
            let store = RuleStore::open(&config.rules_path)?;
            store.replace(RuleSet::default())?;
            formatter.success(&format!(
                "Wrote default rules to {}",
                config.rules_path.display()
            ))
        }
        RulesAction::Check { path } => {
            let rules = load_rule_set(Path::new(&path))?;
            formatter.success(&format!("{} is valid ({} rules)", path, rules.rules.len()))
        }
        RulesAction::Install { path } => {
            let rules = load_rule_set(Path::new(&path))?;
            let count = rules.rules.len();
            let store = RuleStore::open(&config.rules_path)?;
            store.replace(rules)?;
            formatter.success(&format!(
                "Installed {} rules into {}",
                count,
                config.rules_path.display()
            ))
        }
    };

    println!("{}", message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;
    use depsight_pipeline::PipelineConfig;
    use tempfile::tempdir;

    fn config(rules_path: &Path) -> Config {
        Config {
            rules_path: rules_path.to_path_buf(),
            pipeline: PipelineConfig::default(),
        }
    }

    fn run(action: RulesAction, config: &Config) -> Result<()> {
        execute_rules(RulesArgs { action }, config, &Formatter::new(CliFormat::Table, false))
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let config = config(&dir.path().join("rules.toml"));

        run(RulesAction::Init { force: false }, &config).unwrap();
        assert_eq!(load_rule_set(&config.rules_path).unwrap(), RuleSet::default());

        assert!(matches!(
            run(RulesAction::Init { force: false }, &config),
            Err(CliError::InvalidInput(_))
        ));
        run(RulesAction::Init { force: true }, &config).unwrap();
    }

    #[test]
    fn test_install_validates_first() {
        let dir = tempdir().unwrap();
        let config = config(&dir.path().join("rules.toml"));
        let candidate = dir.path().join("candidate.toml");

        std::fs::write(&candidate, "version = 7\n").unwrap();
        let path = candidate.to_str().unwrap().to_string();
        assert!(run(RulesAction::Check { path: path.clone() }, &config).is_err());
        assert!(run(RulesAction::Install { path }, &config).is_err());
        assert!(!config.rules_path.exists());

        std::fs::write(&candidate, RuleSet::empty(0.4).to_toml().unwrap()).unwrap();
        let path = candidate.to_str().unwrap().to_string();
        run(RulesAction::Install { path }, &config).unwrap();
        assert_eq!(load_rule_set(&config.rules_path).unwrap().default_score, 0.4);
    }
}
