//! Plateau CLI - Command-line interface for the convergence analyzer.

use clap::Parser;
use plateau_cli::commands;
use plateau_cli::{Cli, Command, Config, Formatter};
use plateau_controller::CancellationFlag;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // --verbose wins over RUST_LOG
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Log to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run() -> plateau_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Run(args) => {
            let cancel = CancellationFlag::new();
            let handle = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received, stopping after the current iteration");
                    handle.cancel();
                }
            });
            commands::execute_run(args, &config, &formatter, cancel).await?;
        }
        Command::Compare(args) => commands::execute_compare(args, &config, &formatter)?,
        Command::Select(args) => commands::execute_select(args, &config, &formatter)?,
        Command::Strategies => commands::execute_strategies(&formatter)?,
        Command::InitConfig(args) => commands::execute_init_config(args, &formatter)?,
    }

    Ok(())
}
