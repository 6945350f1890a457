//! Extraction results - normalized engine output for one iteration

use crate::IterationLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Pairwise term similarity: `matrix[t1][t2]` is the similarity of t1 to t2
pub type SimilarityMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// Corpus-level record for one extracted term
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TermRecord {
    /// Importance score assigned by the engine (the term's weight)
    pub score: f64,

    /// Number of occurrences across the corpus
    pub occurrences: u64,

    /// Number of pattern matches reported by the engine
    pub matches: u64,
}

/// Per-document record for one term
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DocTermRecord {
    /// Occurrences of the term in the document
    pub occurrences: u64,

    /// Engine-assigned weight (tf-idf)
    pub weight: f64,
}

/// Normalized output of one extraction run
///
/// Every map is key-unique by construction. `doc_terms` only carries ids of
/// documents present in the iteration's manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Which iteration produced this result
    pub iteration: IterationLabel,

    /// Term string → corpus-level record
    #[serde(default)]
    pub terms: BTreeMap<String, TermRecord>,

    /// Document id → term string → per-document record
    #[serde(default)]
    pub doc_terms: BTreeMap<String, BTreeMap<String, DocTermRecord>>,

    /// Author → term string → score
    #[serde(default)]
    pub author_terms: BTreeMap<String, BTreeMap<String, f64>>,

    /// Term similarity matrix, empty when the engine produced none
    #[serde(default)]
    pub term_similarity: SimilarityMatrix,

    /// When the result was collected (seconds since Unix epoch)
    pub timestamp: u64,

    /// Directory the engine wrote its artifacts to
    pub source_directory: PathBuf,
}

impl ExtractionResult {
    /// Create an empty result for an iteration
    pub fn empty(iteration: IterationLabel, source_directory: impl Into<PathBuf>) -> Self {
        Self {
            iteration,
            terms: BTreeMap::new(),
            doc_terms: BTreeMap::new(),
            author_terms: BTreeMap::new(),
            term_similarity: BTreeMap::new(),
            timestamp: 0,
            source_directory: source_directory.into(),
        }
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of documents carrying term associations
    pub fn document_count(&self) -> usize {
        self.doc_terms.len()
    }

    /// Set of term keys
    pub fn term_keys(&self) -> BTreeSet<&str> {
        self.terms.keys().map(String::as_str).collect()
    }

    /// Set of document ids with term associations
    pub fn document_keys(&self) -> BTreeSet<&str> {
        self.doc_terms.keys().map(String::as_str).collect()
    }

    /// Whether the engine produced a term similarity matrix
    pub fn has_similarity(&self) -> bool {
        !self.term_similarity.is_empty()
    }

    /// Weight of a term, 0.0 when absent
    pub fn weight(&self, term: &str) -> f64 {
        self.terms.get(term).map(|t| t.score).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionResult {
        let mut result = ExtractionResult::empty(IterationLabel::numeric(1), "/tmp/out/1");
        result.terms.insert(
            "categorical imperative".to_string(),
            TermRecord { score: 0.9, occurrences: 12, matches: 3 },
        );
        result.terms.insert(
            "synthetic a priori".to_string(),
            TermRecord { score: 0.4, occurrences: 5, matches: 1 },
        );
        result
            .doc_terms
            .entry("w1".to_string())
            .or_default()
            .insert("synthetic a priori".to_string(), DocTermRecord { occurrences: 5, weight: 0.2 });
        result
    }

    #[test]
    fn test_counts() {
        let result = sample();
        assert_eq!(result.term_count(), 2);
        assert_eq!(result.document_count(), 1);
        assert!(!result.has_similarity());
    }

    #[test]
    fn test_weight_lookup() {
        let result = sample();
        assert_eq!(result.weight("categorical imperative"), 0.9);
        assert_eq!(result.weight("missing"), 0.0);
    }

    #[test]
    fn test_term_keys_are_sorted() {
        let result = sample();
        let keys: Vec<_> = result.term_keys().into_iter().collect();
        assert_eq!(keys, vec!["categorical imperative", "synthetic a priori"]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let result = sample();
        let json = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
