//! Strategy names - the closed set of diff strategies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a diff strategy
///
/// The set is closed: callers select a strategy by name and the name is
/// resolved through [`StrategyKind::from_name`], never through open-ended lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Structural term churn plus score changes of shared terms
    TermWeight,

    /// Jaccard distance, refined by the term similarity matrix when present
    SemanticSimilarity,

    /// Entropy and per-document term distribution changes
    DocumentDistribution,

    /// Weighted combination of the three strategies above
    Composite,
}

/// Name table used for lookup; order is the display order
const STRATEGY_TABLE: [(&str, StrategyKind); 4] = [
    ("term_weight", StrategyKind::TermWeight),
    ("semantic_similarity", StrategyKind::SemanticSimilarity),
    ("document_distribution", StrategyKind::DocumentDistribution),
    ("composite", StrategyKind::Composite),
];

impl StrategyKind {
    /// All strategies, in display order
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::TermWeight,
        StrategyKind::SemanticSimilarity,
        StrategyKind::DocumentDistribution,
        StrategyKind::Composite,
    ];

    /// The strategies a composite combines
    pub const COMPONENTS: [StrategyKind; 3] = [
        StrategyKind::TermWeight,
        StrategyKind::SemanticSimilarity,
        StrategyKind::DocumentDistribution,
    ];

    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::TermWeight => "term_weight",
            StrategyKind::SemanticSimilarity => "semantic_similarity",
            StrategyKind::DocumentDistribution => "document_distribution",
            StrategyKind::Composite => "composite",
        }
    }

    /// Resolve a strategy by name (case-insensitive, `-` accepted for `_`)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        STRATEGY_TABLE
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, kind)| *kind)
    }

    /// One-line description for listings
    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::TermWeight => "term additions/removals and score drift of shared terms",
            StrategyKind::SemanticSimilarity => "Jaccard distance refined by term similarity matrices",
            StrategyKind::DocumentDistribution => "entropy and per-document term distribution change",
            StrategyKind::Composite => "weighted sum of the other strategies",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("Unknown diff strategy: {}", s))
    }
}
