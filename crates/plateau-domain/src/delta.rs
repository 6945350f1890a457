//! Deltas and deltas of deltas

use crate::{IterationLabel, StrategyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quantified difference between two consecutive extraction results
///
/// A delta is a pure function of its two inputs: it carries no timestamp or
/// other ambient state, so recomputing it always yields the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Comparison label, e.g. `"2 -> 3"`
    pub comparison: String,

    /// Strategy that produced this delta
    pub strategy: StrategyKind,

    /// Non-negative magnitude of change
    pub magnitude: f64,

    /// Strategy-specific explanation of the magnitude
    pub details: DeltaDetails,
}

impl Delta {
    /// Build the comparison label for two iterations
    pub fn comparison_label(from: &IterationLabel, to: &IterationLabel) -> String {
        format!("{} -> {}", from, to)
    }
}

/// Strategy-specific detail payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDetails {
    /// Produced by the term-weight strategy
    TermWeight(TermWeightDetails),

    /// Produced by the semantic-similarity strategy
    SemanticSimilarity(SemanticSimilarityDetails),

    /// Produced by the document-distribution strategy
    DocumentDistribution(DocumentDistributionDetails),

    /// Produced by the composite strategy
    Composite(CompositeDetails),
}

/// Score change of a term present in both results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightChange {
    /// Weight in the earlier result
    pub old_weight: f64,

    /// Weight in the later result
    pub new_weight: f64,

    /// `new_weight - old_weight`
    pub change: f64,

    /// `change / old_weight`; `None` when the old weight is not positive
    pub relative_change: Option<f64>,
}

/// Details of a term-weight delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TermWeightDetails {
    /// Terms only in the later result
    pub added_terms: Vec<String>,
    /// Terms only in the earlier result
    pub removed_terms: Vec<String>,
    /// Terms in both results
    pub common_terms: Vec<String>,
    /// Shared terms whose weight changed
    pub weight_changes: BTreeMap<String, WeightChange>,
    /// `(|added| + |removed|) / max(|A|, |B|)`
    pub structural_change: f64,
    /// Mean absolute weight change over shared terms
    pub weight_change_magnitude: f64,
}

/// Details of a semantic-similarity delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticSimilarityDetails {
    /// `|A ∩ B| / |A ∪ B|`
    pub jaccard_similarity: f64,
    /// `1 - jaccard_similarity`
    pub jaccard_distance: f64,
    /// Mean absolute difference of pairwise similarities
    pub semantic_distance: f64,
    /// Number of ordered term pairs compared
    pub compared_pairs: usize,
    /// `|A ∩ B|`
    pub intersection_size: usize,
    /// `|A ∪ B|`
    pub union_size: usize,
    /// Whether both results carried a similarity matrix
    pub used_similarity_matrix: bool,
}

/// Details of a document-distribution delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentDistributionDetails {
    /// Entropy of the earlier result's term distribution (bits)
    pub entropy_a: f64,
    /// Entropy of the later result's term distribution (bits)
    pub entropy_b: f64,
    /// `|entropy_b - entropy_a|`
    pub entropy_change: f64,
    /// Documents only in the later result
    pub added_docs: Vec<String>,
    /// Documents only in the earlier result
    pub removed_docs: Vec<String>,
    /// Documents in both results
    pub common_docs: Vec<String>,
    /// `(|added| + |removed|) / max(|docs_A|, |docs_B|)`
    pub doc_structural_change: f64,
    /// Mean cosine distance of shared documents' term vectors
    pub distribution_changes: f64,
}

/// Details of a composite delta
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeDetails {
    /// Component deltas, one per combined strategy
    pub components: Vec<Delta>,
    /// Weight applied to each component, by strategy name
    pub weights: BTreeMap<String, f64>,
}

/// Difference between two consecutive deltas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaOfDelta {
    /// Comparison label, e.g. `"d(1 -> 2) vs d(2 -> 3)"`
    pub comparison: String,

    /// `current.magnitude - previous.magnitude`
    pub magnitude_change: f64,

    /// `|magnitude_change|`
    pub magnitude: f64,
}

impl DeltaOfDelta {
    /// Compare two consecutive deltas
    pub fn between(previous: &Delta, current: &Delta) -> Self {
        let magnitude_change = current.magnitude - previous.magnitude;
        Self {
            comparison: format!("d({}) vs d({})", previous.comparison, current.comparison),
            magnitude_change,
            magnitude: magnitude_change.abs(),
        }
    }
}
