//! Error types for corpus construction and selection

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building manifests or selecting documents
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A document's source file does not exist
    #[error("Document not found: {id} ({})", .path.display())]
    DocumentNotFound {
        /// Document identifier
        id: String,
        /// Path that was checked
        path: PathBuf,
    },

    /// Selection constraints cannot be satisfied
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for CorpusError {
    fn from(e: std::io::Error) -> Self {
        CorpusError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(e: serde_json::Error) -> Self {
        CorpusError::Json(e.to_string())
    }
}
