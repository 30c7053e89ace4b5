//! Depsight CLI library.
//!
//! Argument parsing, configuration resolution, claim input, command execution
//! and output formatting for the `depsight` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
