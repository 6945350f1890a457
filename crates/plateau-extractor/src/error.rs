//! Error types for the Extraction Invocation Adapter

use plateau_corpus::CorpusError;
use thiserror::Error;

/// Errors that can occur while invoking the engine or reading its output
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The engine could not be started, exited non-zero, or timed out
    #[error("Extraction engine error: {reason}{}", stderr_suffix(.stderr))]
    Engine {
        /// What went wrong
        reason: String,
        /// Captured standard error of the engine process
        stderr: String,
    },

    /// A required output artifact could not be parsed
    #[error("Malformed engine output in {file}: {message}")]
    MalformedOutput {
        /// Artifact file name
        file: String,
        /// Parse failure
        message: String,
    },

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl ExtractionError {
    /// Build an engine error without captured output
    pub fn engine(reason: impl Into<String>) -> Self {
        ExtractionError::Engine {
            reason: reason.into(),
            stderr: String::new(),
        }
    }

    /// Whether the engine itself failed (the only retryable kind)
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, ExtractionError::Engine { .. })
    }

    /// Captured standard error, if this is an engine failure
    pub fn stderr(&self) -> Option<&str> {
        match self {
            ExtractionError::Engine { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractionError {
    fn from(e: std::io::Error) -> Self {
        ExtractionError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(e: serde_json::Error) -> Self {
        ExtractionError::Json(e.to_string())
    }
}

impl From<CorpusError> for ExtractionError {
    fn from(e: CorpusError) -> Self {
        match e {
            CorpusError::Json(message) => ExtractionError::Json(message),
            other => ExtractionError::Io(other.to_string()),
        }
    }
}
