//! Combination coefficients for the diff strategies
//!
//! The defaults are the empirically chosen constants the analysis has always
//! used. They are kept as defaults rather than re-derived.

use crate::error::DiffError;
use plateau_domain::StrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coefficients of the term-weight strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermWeightCoefficients {
    /// Weight of the added/removed term ratio
    pub structural: f64,
    /// Weight of the mean absolute score change
    pub weight_change: f64,
}

impl Default for TermWeightCoefficients {
    fn default() -> Self {
        Self {
            structural: 0.6,
            weight_change: 0.4,
        }
    }
}

/// Coefficients of the semantic-similarity strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticCoefficients {
    /// Weight of the Jaccard distance when a similarity matrix is present
    pub jaccard: f64,
    /// Weight of the similarity-matrix distance
    pub semantic: f64,
}

impl Default for SemanticCoefficients {
    fn default() -> Self {
        Self {
            jaccard: 0.3,
            semantic: 0.7,
        }
    }
}

/// Coefficients of the document-distribution strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionCoefficients {
    /// Weight of the entropy change
    pub entropy: f64,
    /// Weight of the added/removed document ratio
    pub structural: f64,
    /// Weight of the mean within-document cosine distance
    pub distribution: f64,
}

impl Default for DistributionCoefficients {
    fn default() -> Self {
        Self {
            entropy: 0.4,
            structural: 0.3,
            distribution: 0.3,
        }
    }
}

/// Configuration for every diff strategy
///
/// # Examples
///
/// ```
/// use plateau_diff::DiffConfig;
///
/// let config = DiffConfig::from_toml(r#"
///     [composite_weights]
///     term_weight = 1.0
/// "#).unwrap();
/// assert_eq!(config.composite_weights.len(), 1);
/// assert_eq!(config.term_weight.structural, 0.6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Term-weight coefficients
    pub term_weight: TermWeightCoefficients,

    /// Semantic-similarity coefficients
    pub semantic_similarity: SemanticCoefficients,

    /// Document-distribution coefficients
    pub document_distribution: DistributionCoefficients,

    /// Composite weights by strategy name; absent strategies contribute 0
    pub composite_weights: BTreeMap<String, f64>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            term_weight: TermWeightCoefficients::default(),
            semantic_similarity: SemanticCoefficients::default(),
            document_distribution: DistributionCoefficients::default(),
            composite_weights: default_composite_weights(),
        }
    }
}

/// Default composite weights: term_weight 0.4, semantic_similarity 0.3,
/// document_distribution 0.3
pub fn default_composite_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (StrategyKind::TermWeight.as_str().to_string(), 0.4),
        (StrategyKind::SemanticSimilarity.as_str().to_string(), 0.3),
        (StrategyKind::DocumentDistribution.as_str().to_string(), 0.3),
    ])
}

fn check(name: &str, value: f64) -> Result<(), DiffError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DiffError::InvalidCoefficients(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

impl DiffConfig {
    /// Replace the composite weight map
    pub fn with_composite_weights(mut self, weights: BTreeMap<String, f64>) -> Self {
        self.composite_weights = weights;
        self
    }

    /// Validate the configuration
    ///
    /// Every coefficient must be finite and non-negative, which keeps every
    /// magnitude bounded below by 0. Composite weight keys must name one of
    /// the three component strategies.
    pub fn validate(&self) -> Result<(), DiffError> {
        check("term_weight.structural", self.term_weight.structural)?;
        check("term_weight.weight_change", self.term_weight.weight_change)?;
        check("semantic_similarity.jaccard", self.semantic_similarity.jaccard)?;
        check("semantic_similarity.semantic", self.semantic_similarity.semantic)?;
        check("document_distribution.entropy", self.document_distribution.entropy)?;
        check("document_distribution.structural", self.document_distribution.structural)?;
        check("document_distribution.distribution", self.document_distribution.distribution)?;

        for (name, weight) in &self.composite_weights {
            let is_component = StrategyKind::from_name(name)
                .map(|kind| StrategyKind::COMPONENTS.contains(&kind))
                .unwrap_or(false);
            if !is_component {
                return Err(DiffError::InvalidCoefficients(format!(
                    "composite weight '{}' does not name a component strategy",
                    name
                )));
            }
            check(&format!("composite_weights.{}", name), *weight)?;
        }
        Ok(())
    }

    /// Composite weight of a strategy, 0.0 when absent
    pub fn composite_weight(&self, kind: StrategyKind) -> f64 {
        self.composite_weights
            .get(kind.as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, DiffError> {
        toml::from_str(toml_str)
            .map_err(|e| DiffError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, DiffError> {
        toml::to_string_pretty(self)
            .map_err(|e| DiffError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
