//! Error types for the convergence controller

use plateau_corpus::CorpusError;
use plateau_extractor::ExtractionError;
use thiserror::Error;

/// Errors that end a run
#[derive(Error, Debug)]
pub enum ControllerError {
    /// Rejected before any engine invocation or disk write
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The extraction engine failed; the run halts where it stands
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Corpus could not be assembled
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// Writing a run artifact failed
    #[error("IO error: {0}")]
    Io(String),

    /// A run artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The cancellation flag was set before the next extraction
    #[error("Run cancelled")]
    Cancelled,
}

impl ControllerError {
    /// Engine stderr, when the run ended on an engine failure
    pub fn engine_stderr(&self) -> Option<&str> {
        match self {
            ControllerError::Extraction(e) => e.stderr(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ControllerError {
    fn from(err: std::io::Error) -> Self {
        ControllerError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ControllerError {
    fn from(err: serde_json::Error) -> Self {
        ControllerError::Serialization(err.to_string())
    }
}
