//! Document module - significance-ordered units of input

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A document selected for analysis
///
/// Documents are handed to the controller already sorted from most to least
/// significant. The significance score is only used for ordering and for
/// reporting; the analyzer never re-ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, carried into every manifest unchanged
    pub id: String,

    /// Source file on disk
    pub path: PathBuf,

    /// Significance score under the selection strategy that produced the order
    #[serde(default)]
    pub significance: f64,

    /// Author names, passed through to the manifest
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Free-form provenance note (edition, source catalog, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl Document {
    /// Create a document with no significance score or metadata
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            significance: 0.0,
            authors: Vec::new(),
            provenance: None,
        }
    }

    /// Set the significance score
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Set the author list
    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    /// Set the provenance note
    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// Human-readable name: the file stem, falling back to the id
    pub fn display_name(&self) -> String {
        file_stem(&self.path).unwrap_or_else(|| self.id.clone())
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_file_stem() {
        let doc = Document::new("w1", "/texts/critique_of_pure_reason.txt");
        assert_eq!(doc.display_name(), "critique_of_pure_reason");
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let doc = Document::new("w1", "");
        assert_eq!(doc.display_name(), "w1");
    }

    #[test]
    fn test_builder() {
        let doc = Document::new("w2", "/texts/ethics.txt")
            .with_significance(0.87)
            .with_authors(vec!["Spinoza".to_string()])
            .with_provenance("gutenberg");
        assert_eq!(doc.significance, 0.87);
        assert_eq!(doc.authors, vec!["Spinoza"]);
        assert_eq!(doc.provenance.as_deref(), Some("gutenberg"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let doc: Document = serde_json::from_str(r#"{"id": "w3", "path": "/a.txt"}"#).unwrap();
        assert_eq!(doc.significance, 0.0);
        assert!(doc.authors.is_empty());
    }
}
