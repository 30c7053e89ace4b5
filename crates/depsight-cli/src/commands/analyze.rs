//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the analyze command.
pub fn execute_analyze(args: AnalyzeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let output = super::run_pipeline(&args.input, config)?;
    println!("{}", formatter.format_analysis(&output, args.report)?);
    Ok(())
}
