//! Candidate catalog - precomputed scores for document selection

use crate::error::CorpusError;
use plateau_domain::Document;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One candidate document with its precomputed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier
    pub id: String,

    /// Source file
    pub path: PathBuf,

    /// Primary significance score
    #[serde(default)]
    pub score: f64,

    /// Secondary metric, e.g. inbound link count
    #[serde(default)]
    pub secondary_metric: f64,

    /// When the candidate was added (seconds since Unix epoch)
    #[serde(default)]
    pub added_at: u64,

    /// Author names
    #[serde(default)]
    pub authors: Vec<String>,

    /// Obsolete candidates are skipped unless explicitly included
    #[serde(default)]
    pub obsolete: bool,
}

impl CatalogEntry {
    /// Create an entry with a score and no other metrics
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, score: f64) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            score,
            secondary_metric: 0.0,
            added_at: 0,
            authors: Vec::new(),
            obsolete: false,
        }
    }

    /// Set the secondary metric
    pub fn with_secondary_metric(mut self, secondary_metric: f64) -> Self {
        self.secondary_metric = secondary_metric;
        self
    }

    /// Set the added-at timestamp
    pub fn with_added_at(mut self, added_at: u64) -> Self {
        self.added_at = added_at;
        self
    }

    /// Mark the entry obsolete
    pub fn obsolete(mut self) -> Self {
        self.obsolete = true;
        self
    }

    pub(crate) fn to_document(&self, significance: f64) -> Document {
        Document::new(self.id.clone(), self.path.clone())
            .with_significance(significance)
            .with_authors(self.authors.clone())
    }
}

/// The pool of candidates a selector ranks
///
/// Serialized as `{"entries": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Candidates in no particular order
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create a catalog from entries
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a JSON file
    ///
    /// Relative entry paths are resolved against the catalog file's directory.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let content = fs::read_to_string(path)?;
        let mut catalog: Catalog = serde_json::from_str(&content)?;
        if let Some(base) = path.parent() {
            for entry in &mut catalog.entries {
                if entry.path.is_relative() {
                    entry.path = base.join(&entry.path);
                }
            }
        }
        Ok(catalog)
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no candidates
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{"entries": [
                {"id": "a", "path": "works/a.txt", "score": 0.5},
                {"id": "b", "path": "/abs/b.txt", "score": 0.2, "obsolete": true}
            ]}"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].path, dir.path().join("works/a.txt"));
        assert_eq!(catalog.entries[1].path, PathBuf::from("/abs/b.txt"));
        assert!(catalog.entries[1].obsolete);
        assert_eq!(catalog.entries[0].secondary_metric, 0.0);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[not json").unwrap();
        assert!(matches!(Catalog::load(&path), Err(CorpusError::Json(_))));
    }
}
