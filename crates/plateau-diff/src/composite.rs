//! Composite strategy - weighted sum of the component strategies

use crate::config::DiffConfig;
use crate::distribution::DocumentDistributionStrategy;
use crate::semantic::SemanticSimilarityStrategy;
use crate::term_weight::TermWeightStrategy;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{CompositeDetails, Delta, DeltaDetails, ExtractionResult, StrategyKind};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::trace;

/// Runs every component strategy and sums `weight[name] * magnitude[name]`
///
/// Components are independent and pure, so they are evaluated in parallel.
/// The sum is taken in the fixed component order afterwards, which keeps the
/// result identical across runs.
#[derive(Debug, Clone)]
pub struct CompositeStrategy {
    term_weight: TermWeightStrategy,
    semantic: SemanticSimilarityStrategy,
    distribution: DocumentDistributionStrategy,
    weights: BTreeMap<String, f64>,
}

impl CompositeStrategy {
    /// Build the composite from a diff configuration
    pub fn new(config: &DiffConfig) -> Self {
        Self {
            term_weight: TermWeightStrategy::new(config.term_weight),
            semantic: SemanticSimilarityStrategy::new(config.semantic_similarity),
            distribution: DocumentDistributionStrategy::new(config.document_distribution),
            weights: config.composite_weights.clone(),
        }
    }

    fn component(&self, kind: StrategyKind) -> Option<&dyn DiffStrategy> {
        match kind {
            StrategyKind::TermWeight => Some(&self.term_weight),
            StrategyKind::SemanticSimilarity => Some(&self.semantic),
            StrategyKind::DocumentDistribution => Some(&self.distribution),
            StrategyKind::Composite => None,
        }
    }

    fn weight(&self, kind: StrategyKind) -> f64 {
        self.weights.get(kind.as_str()).copied().unwrap_or(0.0)
    }
}

impl Default for CompositeStrategy {
    fn default() -> Self {
        Self::new(&DiffConfig::default())
    }
}

impl DiffStrategy for CompositeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Composite
    }

    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta {
        let components: Vec<Delta> = StrategyKind::COMPONENTS
            .par_iter()
            .filter_map(|kind| self.component(*kind))
            .map(|strategy| strategy.compute(a, b))
            .collect();

        let mut magnitude = 0.0;
        for delta in &components {
            let weight = self.weight(delta.strategy);
            trace!(strategy = %delta.strategy, weight, magnitude = delta.magnitude, "composite component");
            magnitude += weight * delta.magnitude;
        }

        Delta {
            comparison: Delta::comparison_label(&a.iteration, &b.iteration),
            strategy: StrategyKind::Composite,
            magnitude,
            details: DeltaDetails::Composite(CompositeDetails {
                components,
                weights: self.weights.clone(),
            }),
        }
    }
}
