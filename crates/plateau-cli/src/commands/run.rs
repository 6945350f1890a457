//! Run command implementation.

use crate::cli::RunArgs;
use crate::commands::select::{resolve_selection, select_documents};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use plateau_controller::{CancellationFlag, Controller, ControllerConfig};
use plateau_domain::Document;
use plateau_extractor::{CommandRunner, Extractor, ExtractorConfig};
use std::fs;
use tracing::info;

/// Controller settings: `[analysis]` and `[diff]`, then flags. A catalog run
/// also records its selection.
pub fn controller_config(args: &RunArgs, config: &Config) -> ControllerConfig {
    let mut controller = config.controller_config();
    if let Some(threshold) = args.threshold {
        controller.threshold = threshold;
    }
    if let Some(strategy) = &args.strategy {
        controller.strategy = strategy.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        controller.output_dir = output_dir.clone();
    }
    if let Some(max) = args.max_iterations {
        controller.max_iterations = Some(max);
    }
    if let Some(style) = args.label_style {
        controller.label_style = style.into();
    }
    if let Some(path) = &args.engine_config {
        controller.engine_config_path = Some(path.clone());
    }
    if args.catalog.is_some() {
        let (strategy, criteria) = resolve_selection(&args.selection, config);
        controller = controller.with_selection(strategy, criteria);
    }
    controller
}

/// Engine settings: `[engine]`, then flags.
pub fn extractor_config(args: &RunArgs, config: &Config) -> ExtractorConfig {
    let mut engine = config.engine.clone();
    if let Some(entrypoint) = &args.engine {
        engine.entrypoint = entrypoint.clone();
    }
    if let Some(dir) = &args.engine_dir {
        engine.working_dir = Some(dir.clone());
    }
    if let Some(timeout) = args.timeout {
        engine.timeout_secs = Some(timeout);
    }
    if let Some(retries) = args.retries {
        engine.retry.max_retries = retries;
    }
    engine
}

/// Documents from `--documents` as given, or selected from `--catalog`.
pub fn load_documents(args: &RunArgs, config: &Config) -> Result<Vec<Document>> {
    match (&args.documents, &args.catalog) {
        (Some(path), _) => {
            let contents = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        }
        (None, Some(catalog)) => select_documents(catalog, &args.selection, config),
        (None, None) => Err(CliError::InvalidInput(
            "either --catalog or --documents is required".to_string(),
        )),
    }
}

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &Config,
    formatter: &Formatter,
    cancel: CancellationFlag,
) -> Result<()> {
    let documents = load_documents(&args, config)?;
    info!(documents = documents.len(), "loaded documents");

    let extractor = Extractor::new(CommandRunner::new(), extractor_config(&args, config));
    let controller = Controller::new(controller_config(&args, config), extractor).with_cancellation(cancel);

    let report = controller.run(&documents).await?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
