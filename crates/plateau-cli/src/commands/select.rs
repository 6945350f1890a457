//! Select command implementation.

use crate::cli::{SelectArgs, SelectionArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use plateau_corpus::{Catalog, CatalogSelector};
use plateau_domain::traits::DocumentSelector;
use plateau_domain::{Document, SelectionConstraints, SelectionStrategy};
use std::path::Path;

/// Merge selection flags over the `[selection]` section.
pub fn resolve_selection(args: &SelectionArgs, config: &Config) -> (SelectionStrategy, SelectionConstraints) {
    let strategy = args
        .strategy
        .map(Into::into)
        .unwrap_or(config.selection.strategy);

    let mut constraints = config.constraints();
    if let Some(max) = args.max_documents {
        constraints.max_documents = max;
    }
    if let Some(min) = args.min_score {
        constraints.min_score = Some(min);
    }
    if let Some(seed) = args.seed {
        constraints.seed = seed;
    }
    if args.include_obsolete {
        constraints.include_obsolete = true;
    }
    (strategy, constraints)
}

/// Load a catalog and rank it.
pub fn select_documents(catalog: &Path, args: &SelectionArgs, config: &Config) -> Result<Vec<Document>> {
    let (strategy, constraints) = resolve_selection(args, config);
    let selector = CatalogSelector::new(Catalog::load(catalog)?);
    Ok(selector.select(strategy, &constraints)?)
}

/// Execute the select command.
pub fn execute_select(args: SelectArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let documents = select_documents(&args.catalog, &args.selection, config)?;
    println!("{}", formatter.format_documents(&documents)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SelectionArg;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.selection.seed = 7;
        let args = SelectionArgs {
            strategy: Some(SelectionArg::Random),
            max_documents: Some(3),
            ..SelectionArgs::default()
        };

        let (strategy, constraints) = resolve_selection(&args, &config);
        assert_eq!(strategy, SelectionStrategy::Random);
        assert_eq!(constraints.max_documents, 3);
        assert_eq!(constraints.seed, 7);
        assert!(!constraints.include_obsolete);
    }

    #[test]
    fn test_config_used_without_flags() {
        let mut config = Config::default();
        config.selection.strategy = SelectionStrategy::Recent;
        config.selection.min_score = Some(0.2);

        let (strategy, constraints) = resolve_selection(&SelectionArgs::default(), &config);
        assert_eq!(strategy, SelectionStrategy::Recent);
        assert_eq!(constraints.min_score, Some(0.2));
    }
}
