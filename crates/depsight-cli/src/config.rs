//! Configuration resolution for the CLI.
//!
//! Pipeline thresholds come from `--config` when given, else from `--preset`,
//! else the built-in defaults. Scoring rules live in `--rules`, defaulting to
//! `~/.depsight/rules.toml`.

use crate::cli::{Cli, PresetArg};
use crate::error::{CliError, Result};
use depsight_pipeline::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings resolved from flags, environment and files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scoring rule file
    pub rules_path: PathBuf,

    /// Pipeline thresholds
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Default rule file location.
    pub fn default_rules_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".depsight").join("rules.toml"))
    }

    /// Resolve settings for a parsed command line.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let rules_path = match &cli.rules {
            Some(path) => PathBuf::from(path),
            None => Self::default_rules_path()?,
        };

        let pipeline = match &cli.config {
            Some(path) => load_pipeline_config(Path::new(path))?,
            None => preset(cli.preset.unwrap_or(PresetArg::Default)),
        };

        Ok(Self {
            rules_path,
            pipeline,
        })
    }
}

/// Read and validate a pipeline configuration file.
pub fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Ok(PipelineConfig::from_toml(&contents)?)
}

/// Pipeline configuration for a preset.
pub fn preset(preset: PresetArg) -> PipelineConfig {
    match preset {
        PresetArg::Default => PipelineConfig::default(),
        PresetArg::Strict => PipelineConfig::strict(),
        PresetArg::Lenient => PipelineConfig::lenient(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_paths() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pipeline.toml");
        fs::write(&config_path, "min_dependency_confidence = 0.65\n").unwrap();

        let cli = Cli::parse_from([
            "depsight",
            "--rules",
            "/srv/depsight/rules.toml",
            "--config",
            config_path.to_str().unwrap(),
            "rules",
            "show",
        ]);
        let config = Config::resolve(&cli).unwrap();
        assert_eq!(config.rules_path, PathBuf::from("/srv/depsight/rules.toml"));
        assert_eq!(config.pipeline.min_dependency_confidence, 0.65);
    }

    #[test]
    fn test_preset_without_config_file() {
        let cli = Cli::parse_from([
            "depsight", "--rules", "rules.toml", "--preset", "strict", "rules", "show",
        ]);
        let config = Config::resolve(&cli).unwrap();
        assert_eq!(config.pipeline, PipelineConfig::strict());
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "min_dependency_confidence = 3.0\n").unwrap();
        assert!(matches!(
            load_pipeline_config(&path),
            Err(CliError::Pipeline(_))
        ));
        assert!(matches!(
            load_pipeline_config(&dir.path().join("missing.toml")),
            Err(CliError::Config(_))
        ));
    }
}
