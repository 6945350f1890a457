//! Strategies command implementation.

use crate::error::Result;
use crate::output::Formatter;

/// Execute the strategies command.
pub fn execute_strategies(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_strategies()?);
    Ok(())
}
