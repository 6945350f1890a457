//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use plateau_domain::{LabelStyle, SelectionStrategy};
use std::path::PathBuf;

/// Plateau - find the corpus size at which extracted terminology stops changing.
#[derive(Debug, Parser)]
#[command(name = "plateau")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PLATEAU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the convergence analysis
    Run(RunArgs),

    /// Diff two parsed extraction results
    Compare(CompareArgs),

    /// Rank a document catalog without running the analysis
    Select(SelectArgs),

    /// List diff and selection strategies
    Strategies,

    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

/// Selection overrides shared by `run` and `select`.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Selection strategy
    #[arg(id = "select", long = "select", value_enum)]
    pub strategy: Option<SelectionArg>,

    /// Maximum number of documents
    #[arg(short = 'n', long)]
    pub max_documents: Option<usize>,

    /// Drop documents scoring below this value
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Seed for the random strategy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep documents flagged obsolete
    #[arg(long)]
    pub include_obsolete: bool,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Document catalog to select from (JSON)
    #[arg(long, conflicts_with = "documents", required_unless_present = "documents")]
    pub catalog: Option<PathBuf>,

    /// Pre-ordered document list (JSON array), used as given
    #[arg(long)]
    pub documents: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output directory for run artifacts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Convergence threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Diff strategy
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Maximum number of extraction runs
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Iteration label style
    #[arg(long, value_enum)]
    pub label_style: Option<LabelStyleArg>,

    /// Engine executable
    #[arg(long)]
    pub engine: Option<PathBuf>,

    /// Directory the engine runs in
    #[arg(long)]
    pub engine_dir: Option<PathBuf>,

    /// Engine configuration document (JSON)
    #[arg(long)]
    pub engine_config: Option<PathBuf>,

    /// Engine timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retries after an engine failure
    #[arg(long)]
    pub retries: Option<u32>,
}

/// Arguments for the compare command.
#[derive(Debug, Parser)]
pub struct CompareArgs {
    /// Earlier parsed_result.json
    pub before: PathBuf,

    /// Later parsed_result.json
    pub after: PathBuf,

    /// Diff strategy; every strategy when omitted
    #[arg(short, long)]
    pub strategy: Option<String>,
}

/// Arguments for the select command.
#[derive(Debug, Parser)]
pub struct SelectArgs {
    /// Document catalog (JSON)
    pub catalog: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Arguments for the init-config command.
#[derive(Debug, Parser)]
pub struct InitConfigArgs {
    /// Where to write; defaults to ~/.plateau/config.toml
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Also write a default engine configuration document here
    #[arg(long)]
    pub engine_config: Option<PathBuf>,
}

/// Selection strategy argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SelectionArg {
    /// Primary score, descending
    ByScore,
    /// Secondary metric, descending
    BySecondaryMetric,
    /// Blend of score and secondary metric
    Mixed,
    /// Seeded shuffle
    Random,
    /// Most recently added first
    Recent,
}

/// Label style argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LabelStyleArg {
    /// 1, 2, 3, ...
    Numeric,
    /// A, B, C, ...
    Alphabetic,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<SelectionArg> for SelectionStrategy {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::ByScore => SelectionStrategy::ByScore,
            SelectionArg::BySecondaryMetric => SelectionStrategy::BySecondaryMetric,
            SelectionArg::Mixed => SelectionStrategy::Mixed,
            SelectionArg::Random => SelectionStrategy::Random,
            SelectionArg::Recent => SelectionStrategy::Recent,
        }
    }
}

impl From<LabelStyleArg> for LabelStyle {
    fn from(arg: LabelStyleArg) -> Self {
        match arg {
            LabelStyleArg::Numeric => LabelStyle::Numeric,
            LabelStyleArg::Alphabetic => LabelStyle::Alphabetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from([
            "plateau",
            "run",
            "--catalog",
            "works.json",
            "--select",
            "mixed",
            "-t",
            "0.05",
            "--engine-dir",
            "/opt/saffron",
        ]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.catalog, Some(PathBuf::from("works.json")));
                assert!(matches!(args.selection.strategy, Some(SelectionArg::Mixed)));
                assert_eq!(args.threshold, Some(0.05));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_requires_an_input() {
        assert!(Cli::try_parse_from(["plateau", "run"]).is_err());
        assert!(Cli::try_parse_from([
            "plateau",
            "run",
            "--catalog",
            "a.json",
            "--documents",
            "b.json"
        ])
        .is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["plateau", "strategies", "--format", "json", "-v"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_selection_conversion() {
        let strategy: SelectionStrategy = SelectionArg::BySecondaryMetric.into();
        assert_eq!(strategy, SelectionStrategy::BySecondaryMetric);
    }
}
