//! Manifest module - the corpus description handed to the engine

use crate::IterationLabel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cumulative corpus for one iteration
///
/// Serializes to the engine's input format: `{"documents": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Entries in significance order
    pub documents: Vec<ManifestEntry>,
}

/// One document of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Stable document identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Absolute path to an existing source file
    pub file: PathBuf,

    /// Author names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Position of the entry within the corpus
    pub metadata: ManifestMetadata,
}

/// Positional metadata of a manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Iteration the manifest was built for
    pub iteration: IterationLabel,

    /// 1-based position in significance order
    pub position: usize,

    /// Number of documents in the corpus
    pub total_in_corpus: usize,

    /// Significance score of the document
    pub significance: f64,
}

impl Manifest {
    /// Number of documents in the corpus
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether a document id is part of the corpus
    pub fn contains(&self, id: &str) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    /// Document ids in significance order
    pub fn document_ids(&self) -> Vec<&str> {
        self.documents.iter().map(|d| d.id.as_str()).collect()
    }
}
