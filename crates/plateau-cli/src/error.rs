//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Run failed
    #[error(transparent)]
    Controller(#[from] plateau_controller::ControllerError),

    /// Engine or engine configuration error
    #[error(transparent)]
    Extraction(#[from] plateau_extractor::ExtractionError),

    /// Catalog or selection error
    #[error(transparent)]
    Corpus(#[from] plateau_corpus::CorpusError),

    /// Strategy resolution error
    #[error(transparent)]
    Diff(#[from] plateau_diff::DiffError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
