//! Error types for the diff strategy library

use thiserror::Error;

/// Errors that can occur while resolving or configuring strategies
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// Strategy name not in the fixed variant set
    #[error("Unknown diff strategy: {0} (expected one of term_weight, semantic_similarity, document_distribution, composite)")]
    UnknownStrategy(String),

    /// Coefficient or weight map rejected by validation
    #[error("Invalid coefficients: {0}")]
    InvalidCoefficients(String),

    /// Configuration could not be parsed or serialized
    #[error("Configuration error: {0}")]
    Config(String),
}
