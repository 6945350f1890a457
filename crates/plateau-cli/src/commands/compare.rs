//! Compare command implementation.

use crate::cli::CompareArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use plateau_diff::Strategy;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{Delta, ExtractionResult, StrategyKind};
use std::fs;
use std::path::Path;

fn load_result(path: &Path) -> Result<ExtractionResult> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CliError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Diff two results with one strategy, or with all of them.
pub fn compare(
    before: &ExtractionResult,
    after: &ExtractionResult,
    strategy: Option<&str>,
    config: &Config,
) -> Result<Vec<Delta>> {
    match strategy {
        Some(name) => Ok(vec![Strategy::from_name(name, &config.diff)?.compute(before, after)]),
        None => Ok(StrategyKind::ALL
            .iter()
            .map(|kind| Strategy::from_kind(*kind, &config.diff).compute(before, after))
            .collect()),
    }
}

/// Execute the compare command.
pub fn execute_compare(args: CompareArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let before = load_result(&args.before)?;
    let after = load_result(&args.after)?;
    let deltas = compare(&before, &after, args.strategy.as_deref(), config)?;
    println!("{}", formatter.format_deltas(&deltas)?);
    Ok(())
}
