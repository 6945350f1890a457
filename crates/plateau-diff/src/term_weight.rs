//! Term-weight strategy: term churn plus score drift

use crate::config::TermWeightCoefficients;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{
    Delta, DeltaDetails, ExtractionResult, StrategyKind, TermWeightDetails, WeightChange,
};
use std::collections::BTreeMap;

/// Compares term sets and the scores of terms present in both results
///
/// - `structural_change = (|added| + |removed|) / max(|A|, |B|)`
/// - `weight_change_magnitude = Σ |w_B - w_A| / |common|`
/// - `magnitude = structural * structural_change + weight_change * weight_change_magnitude`
#[derive(Debug, Clone, Copy, Default)]
pub struct TermWeightStrategy {
    coefficients: TermWeightCoefficients,
}

impl TermWeightStrategy {
    /// Create the strategy with the given coefficients
    pub fn new(coefficients: TermWeightCoefficients) -> Self {
        Self { coefficients }
    }

    /// Compute only the details, without the magnitude combination
    pub fn details(a: &ExtractionResult, b: &ExtractionResult) -> TermWeightDetails {
        let keys_a = a.term_keys();
        let keys_b = b.term_keys();

        let added_terms: Vec<String> = keys_b.difference(&keys_a).map(|t| t.to_string()).collect();
        let removed_terms: Vec<String> = keys_a.difference(&keys_b).map(|t| t.to_string()).collect();
        let common: Vec<&str> = keys_a.intersection(&keys_b).copied().collect();

        let mut weight_changes = BTreeMap::new();
        let mut total_weight_change = 0.0;
        for term in &common {
            let old_weight = a.weight(term);
            let new_weight = b.weight(term);
            if old_weight == new_weight {
                continue;
            }
            let change = new_weight - old_weight;
            total_weight_change += change.abs();
            weight_changes.insert(
                term.to_string(),
                WeightChange {
                    old_weight,
                    new_weight,
                    change,
                    relative_change: (old_weight > 0.0).then(|| change / old_weight),
                },
            );
        }

        let total_terms = keys_a.len().max(keys_b.len());
        let structural_change = if total_terms == 0 {
            0.0
        } else {
            (added_terms.len() + removed_terms.len()) as f64 / total_terms as f64
        };
        let weight_change_magnitude = if common.is_empty() {
            0.0
        } else {
            total_weight_change / common.len() as f64
        };

        TermWeightDetails {
            added_terms,
            removed_terms,
            common_terms: common.into_iter().map(str::to_string).collect(),
            weight_changes,
            structural_change,
            weight_change_magnitude,
        }
    }
}

impl DiffStrategy for TermWeightStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TermWeight
    }

    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta {
        let details = Self::details(a, b);
        let magnitude = self.coefficients.structural * details.structural_change
            + self.coefficients.weight_change * details.weight_change_magnitude;

        Delta {
            comparison: Delta::comparison_label(&a.iteration, &b.iteration),
            strategy: StrategyKind::TermWeight,
            magnitude,
            details: DeltaDetails::TermWeight(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::result_with_terms;

    #[test]
    fn test_identical_results_have_zero_magnitude() {
        let a = result_with_terms(1, &[("virtue", 0.8), ("justice", 0.5)]);
        let b = result_with_terms(2, &[("virtue", 0.8), ("justice", 0.5)]);
        let delta = TermWeightStrategy::default().compute(&a, &b);
        assert_eq!(delta.magnitude, 0.0);
    }

    #[test]
    fn test_structural_change_only() {
        // A = {virtue, justice}, B = {virtue, courage}: 1 added, 1 removed, max size 2
        let a = result_with_terms(1, &[("virtue", 0.8), ("justice", 0.5)]);
        let b = result_with_terms(2, &[("virtue", 0.8), ("courage", 0.5)]);
        let delta = TermWeightStrategy::default().compute(&a, &b);

        let DeltaDetails::TermWeight(details) = &delta.details else {
            panic!("expected term weight details");
        };
        assert_eq!(details.added_terms, vec!["courage"]);
        assert_eq!(details.removed_terms, vec!["justice"]);
        assert_eq!(details.common_terms, vec!["virtue"]);
        assert_eq!(details.structural_change, 1.0);
        assert_eq!(details.weight_change_magnitude, 0.0);
        assert!((delta.magnitude - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_weight_change_only() {
        let a = result_with_terms(1, &[("virtue", 0.8), ("justice", 0.5)]);
        let b = result_with_terms(2, &[("virtue", 0.6), ("justice", 0.5)]);
        let delta = TermWeightStrategy::default().compute(&a, &b);

        let DeltaDetails::TermWeight(details) = &delta.details else {
            panic!("expected term weight details");
        };
        assert_eq!(details.weight_changes.len(), 1);
        let change = details.weight_changes["virtue"];
        assert!((change.change + 0.2).abs() < 1e-12);
        assert!((change.relative_change.unwrap() + 0.25).abs() < 1e-12);
        // total change 0.2 over 2 common terms, times 0.4
        assert!((delta.magnitude - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_relative_change_absent_for_zero_weight() {
        let a = result_with_terms(1, &[("virtue", 0.0)]);
        let b = result_with_terms(2, &[("virtue", 0.3)]);
        let details = TermWeightStrategy::details(&a, &b);
        assert!(details.weight_changes["virtue"].relative_change.is_none());
    }

    #[test]
    fn test_both_empty() {
        let a = result_with_terms(1, &[]);
        let b = result_with_terms(2, &[]);
        let delta = TermWeightStrategy::default().compute(&a, &b);
        assert_eq!(delta.magnitude, 0.0);
    }

    #[test]
    fn test_custom_coefficients() {
        let a = result_with_terms(1, &[("virtue", 0.8)]);
        let b = result_with_terms(2, &[("courage", 0.8)]);
        let strategy = TermWeightStrategy::new(TermWeightCoefficients {
            structural: 1.0,
            weight_change: 0.0,
        });
        // 1 added + 1 removed over max size 1
        assert!((strategy.compute(&a, &b).magnitude - 2.0).abs() < 1e-12);
    }
}
