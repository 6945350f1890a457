//! Document-distribution strategy

use crate::config::DistributionCoefficients;
use crate::math::{cosine_similarity, shannon_entropy};
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{
    Delta, DeltaDetails, DocTermRecord, DocumentDistributionDetails, ExtractionResult,
    StrategyKind,
};
use std::collections::BTreeMap;

/// Compares how terms spread across the documents of each result
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentDistributionStrategy {
    coefficients: DistributionCoefficients,
}

impl DocumentDistributionStrategy {
    /// Create the strategy with the given coefficients
    pub fn new(coefficients: DistributionCoefficients) -> Self {
        Self { coefficients }
    }
}

/// Entropy of term occurrences aggregated over every document
fn corpus_entropy(result: &ExtractionResult) -> f64 {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for terms in result.doc_terms.values() {
        for (term, record) in terms {
            *totals.entry(term.as_str()).or_insert(0.0) += record.occurrences as f64;
        }
    }
    shannon_entropy(totals.values())
}

fn occurrence_vector(terms: &BTreeMap<String, DocTermRecord>) -> BTreeMap<&str, f64> {
    terms
        .iter()
        .map(|(term, record)| (term.as_str(), record.occurrences as f64))
        .collect()
}

impl DiffStrategy for DocumentDistributionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DocumentDistribution
    }

    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta {
        let entropy_a = corpus_entropy(a);
        let entropy_b = corpus_entropy(b);
        let entropy_change = (entropy_b - entropy_a).abs();

        let docs_a = a.document_keys();
        let docs_b = b.document_keys();
        let added_docs: Vec<String> = docs_b.difference(&docs_a).map(|d| d.to_string()).collect();
        let removed_docs: Vec<String> = docs_a.difference(&docs_b).map(|d| d.to_string()).collect();
        let common_docs: Vec<String> = docs_a.intersection(&docs_b).map(|d| d.to_string()).collect();

        let total_docs = docs_a.len().max(docs_b.len());
        let doc_structural_change = if total_docs == 0 {
            0.0
        } else {
            (added_docs.len() + removed_docs.len()) as f64 / total_docs as f64
        };

        let mut total_distance = 0.0;
        for doc in &common_docs {
            let (Some(terms_a), Some(terms_b)) = (a.doc_terms.get(doc), b.doc_terms.get(doc)) else {
                continue;
            };
            let similarity =
                cosine_similarity(&occurrence_vector(terms_a), &occurrence_vector(terms_b));
            total_distance += 1.0 - similarity;
        }
        let distribution_changes = if common_docs.is_empty() {
            0.0
        } else {
            total_distance / common_docs.len() as f64
        };

        let magnitude = self.coefficients.entropy * entropy_change
            + self.coefficients.structural * doc_structural_change
            + self.coefficients.distribution * distribution_changes;

        Delta {
            comparison: Delta::comparison_label(&a.iteration, &b.iteration),
            strategy: StrategyKind::DocumentDistribution,
            magnitude,
            details: DeltaDetails::DocumentDistribution(DocumentDistributionDetails {
                entropy_a,
                entropy_b,
                entropy_change,
                added_docs,
                removed_docs,
                common_docs,
                doc_structural_change,
                distribution_changes,
            }),
        }
    }
}
