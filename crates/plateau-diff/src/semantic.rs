//! Semantic-similarity strategy

use crate::config::SemanticCoefficients;
use crate::math::jaccard_distance;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{
    Delta, DeltaDetails, ExtractionResult, SemanticSimilarityDetails, SimilarityMatrix,
    StrategyKind,
};
use std::collections::BTreeSet;

/// Jaccard distance over term sets, refined by the term similarity matrices
/// when both results carry one
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticSimilarityStrategy {
    coefficients: SemanticCoefficients,
}

impl SemanticSimilarityStrategy {
    /// Create the strategy with the given coefficients
    pub fn new(coefficients: SemanticCoefficients) -> Self {
        Self { coefficients }
    }
}

/// Mean absolute difference of pairwise similarities
///
/// Pairs are ordered `(t1, t2)` with `t1 != t2`, both drawn from the row keys
/// common to the two matrices. A pair counts only when both matrices hold a
/// value for it. Returns `(distance, compared_pairs)`.
fn semantic_distance(sim_a: &SimilarityMatrix, sim_b: &SimilarityMatrix) -> (f64, usize) {
    let rows_a: BTreeSet<&str> = sim_a.keys().map(String::as_str).collect();
    let rows_b: BTreeSet<&str> = sim_b.keys().map(String::as_str).collect();
    let common: Vec<&str> = rows_a.intersection(&rows_b).copied().collect();

    let mut total = 0.0;
    let mut pairs = 0usize;
    for t1 in &common {
        let (Some(row_a), Some(row_b)) = (sim_a.get(*t1), sim_b.get(*t1)) else {
            continue;
        };
        for t2 in &common {
            if t1 == t2 {
                continue;
            }
            if let (Some(value_a), Some(value_b)) = (row_a.get(*t2), row_b.get(*t2)) {
                total += (value_a - value_b).abs();
                pairs += 1;
            }
        }
    }

    if pairs == 0 {
        (0.0, 0)
    } else {
        (total / pairs as f64, pairs)
    }
}

impl DiffStrategy for SemanticSimilarityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SemanticSimilarity
    }

    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta {
        let (jaccard, intersection_size, union_size) =
            jaccard_distance(&a.term_keys(), &b.term_keys());
        let used_similarity_matrix = a.has_similarity() && b.has_similarity();

        let (semantic, compared_pairs) = if used_similarity_matrix {
            semantic_distance(&a.term_similarity, &b.term_similarity)
        } else {
            (0.0, 0)
        };

        let magnitude = if used_similarity_matrix {
            self.coefficients.jaccard * jaccard + self.coefficients.semantic * semantic
        } else {
            jaccard
        };

        Delta {
            comparison: Delta::comparison_label(&a.iteration, &b.iteration),
            strategy: StrategyKind::SemanticSimilarity,
            magnitude,
            details: DeltaDetails::SemanticSimilarity(SemanticSimilarityDetails {
                jaccard_similarity: if union_size == 0 { 1.0 } else { 1.0 - jaccard },
                jaccard_distance: jaccard,
                semantic_distance: semantic,
                compared_pairs,
                intersection_size,
                union_size,
                used_similarity_matrix,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{result_with_terms, with_similarity};

    fn details(delta: &Delta) -> &SemanticSimilarityDetails {
        match &delta.details {
            DeltaDetails::SemanticSimilarity(d) => d,
            other => panic!("unexpected details: {:?}", other),
        }
    }

    #[test]
    fn test_jaccard_only_without_matrices() {
        let a = result_with_terms(1, &[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let b = result_with_terms(2, &[("b", 1.0), ("c", 1.0), ("d", 1.0)]);
        let delta = SemanticSimilarityStrategy::default().compute(&a, &b);

        assert!((delta.magnitude - 0.5).abs() < 1e-12);
        let d = details(&delta);
        assert!(!d.used_similarity_matrix);
        assert_eq!((d.intersection_size, d.union_size), (2, 4));
    }

    #[test]
    fn test_matrix_on_one_side_only_falls_back_to_jaccard() {
        let a = with_similarity(
            result_with_terms(1, &[("a", 1.0), ("b", 1.0)]),
            &[("a", "b", 0.9)],
        );
        let b = result_with_terms(2, &[("a", 1.0)]);
        let delta = SemanticSimilarityStrategy::default().compute(&a, &b);
        assert!((delta.magnitude - 0.5).abs() < 1e-12);
        assert!(!details(&delta).used_similarity_matrix);
    }

    #[test]
    fn test_matrix_path() {
        let terms = [("a", 1.0), ("b", 1.0)];
        let a = with_similarity(
            result_with_terms(1, &terms),
            &[("a", "b", 0.9), ("b", "a", 0.9), ("a", "a", 1.0)],
        );
        let b = with_similarity(
            result_with_terms(2, &terms),
            &[("a", "b", 0.5), ("b", "a", 0.7), ("a", "a", 0.2)],
        );
        let delta = SemanticSimilarityStrategy::default().compute(&a, &b);
        let d = details(&delta);

        // self pair skipped; |0.9-0.5| and |0.9-0.7| averaged
        assert_eq!(d.compared_pairs, 2);
        assert!((d.semantic_distance - 0.3).abs() < 1e-12);
        assert_eq!(d.jaccard_distance, 0.0);
        assert!((delta.magnitude - 0.7 * 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_pairs_missing_on_one_side_are_ignored() {
        let terms = [("a", 1.0), ("b", 1.0), ("c", 1.0)];
        let a = with_similarity(
            result_with_terms(1, &terms),
            &[("a", "b", 0.9), ("a", "c", 0.4), ("c", "a", 0.4), ("b", "a", 0.9)],
        );
        let b = with_similarity(
            result_with_terms(2, &terms),
            &[("a", "c", 0.1), ("c", "a", 0.2)],
        );
        let d = SemanticSimilarityStrategy::default().compute(&a, &b);

        // common rows are {a, c}; b is not a row of the second matrix
        assert_eq!(details(&d).compared_pairs, 2);
        assert!((details(&d).semantic_distance - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_columns_outside_common_rows_are_not_compared() {
        let terms = [("a", 1.0), ("b", 1.0)];
        let a = with_similarity(result_with_terms(1, &terms), &[("a", "b", 0.9)]);
        let b = with_similarity(result_with_terms(2, &terms), &[("a", "b", 0.1)]);
        let delta = SemanticSimilarityStrategy::default().compute(&a, &b);
        let d = details(&delta);

        assert!(d.used_similarity_matrix);
        assert_eq!(d.compared_pairs, 0);
        assert_eq!(d.semantic_distance, 0.0);
        assert_eq!(delta.magnitude, 0.0);
    }

    #[test]
    fn test_empty_results() {
        let a = result_with_terms(1, &[]);
        let b = result_with_terms(2, &[]);
        let delta = SemanticSimilarityStrategy::default().compute(&a, &b);
        assert_eq!(delta.magnitude, 0.0);
        assert_eq!(details(&delta).jaccard_similarity, 1.0);
    }
}
