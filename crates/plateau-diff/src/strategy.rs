//! Closed strategy dispatch

use crate::composite::CompositeStrategy;
use crate::config::DiffConfig;
use crate::distribution::DocumentDistributionStrategy;
use crate::error::DiffError;
use crate::semantic::SemanticSimilarityStrategy;
use crate::term_weight::TermWeightStrategy;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{Delta, ExtractionResult, StrategyKind};

/// One of the four diff strategies, selected by [`StrategyKind`]
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Term churn plus weight drift
    TermWeight(TermWeightStrategy),
    /// Jaccard plus similarity-matrix drift
    SemanticSimilarity(SemanticSimilarityStrategy),
    /// Entropy and per-document distribution change
    DocumentDistribution(DocumentDistributionStrategy),
    /// Weighted combination
    Composite(CompositeStrategy),
}

impl Strategy {
    /// Build the strategy for a kind using the configured coefficients
    pub fn from_kind(kind: StrategyKind, config: &DiffConfig) -> Self {
        match kind {
            StrategyKind::TermWeight => Strategy::TermWeight(TermWeightStrategy::new(config.term_weight)),
            StrategyKind::SemanticSimilarity => Strategy::SemanticSimilarity(
                SemanticSimilarityStrategy::new(config.semantic_similarity),
            ),
            StrategyKind::DocumentDistribution => Strategy::DocumentDistribution(
                DocumentDistributionStrategy::new(config.document_distribution),
            ),
            StrategyKind::Composite => Strategy::Composite(CompositeStrategy::new(config)),
        }
    }

    /// Resolve a strategy name through the name table
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::UnknownStrategy`] for names outside the closed set.
    pub fn from_name(name: &str, config: &DiffConfig) -> Result<Self, DiffError> {
        let kind = StrategyKind::from_name(name)
            .ok_or_else(|| DiffError::UnknownStrategy(name.to_string()))?;
        Ok(Self::from_kind(kind, config))
    }

    fn inner(&self) -> &dyn DiffStrategy {
        match self {
            Strategy::TermWeight(s) => s,
            Strategy::SemanticSimilarity(s) => s,
            Strategy::DocumentDistribution(s) => s,
            Strategy::Composite(s) => s,
        }
    }
}

impl DiffStrategy for Strategy {
    fn kind(&self) -> StrategyKind {
        self.inner().kind()
    }

    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta {
        self.inner().compute(a, b)
    }
}
