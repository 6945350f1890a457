//! Selection strategies for ordering candidate documents

use serde::{Deserialize, Serialize};

/// How candidate documents are ranked from most to least significant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Primary significance score, descending
    #[default]
    ByScore,
    /// Secondary metric (e.g. link count), descending
    BySecondaryMetric,
    /// `0.6 * score + 0.4 * normalized secondary metric`, descending
    Mixed,
    /// Seeded shuffle
    Random,
    /// Most recently added first
    Recent,
}

impl SelectionStrategy {
    /// All strategies, in display order
    pub const ALL: [SelectionStrategy; 5] = [
        SelectionStrategy::ByScore,
        SelectionStrategy::BySecondaryMetric,
        SelectionStrategy::Mixed,
        SelectionStrategy::Random,
        SelectionStrategy::Recent,
    ];

    /// Get the strategy name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionStrategy::ByScore => "by_score",
            SelectionStrategy::BySecondaryMetric => "by_secondary_metric",
            SelectionStrategy::Mixed => "mixed",
            SelectionStrategy::Random => "random",
            SelectionStrategy::Recent => "recent",
        }
    }

    /// Parse a strategy from its name
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|st| st.as_str() == normalized)
    }
}

impl std::str::FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown selection strategy: {}", s))
    }
}

/// Filters and limits applied during selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConstraints {
    /// Drop candidates whose score is below this value
    #[serde(default)]
    pub min_score: Option<f64>,

    /// Keep at most this many documents
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    /// Seed for the random strategy
    #[serde(default)]
    pub seed: u64,

    /// Keep candidates flagged obsolete
    #[serde(default)]
    pub include_obsolete: bool,
}

fn default_max_documents() -> usize {
    50
}

impl Default for SelectionConstraints {
    fn default() -> Self {
        Self {
            min_score: None,
            max_documents: default_max_documents(),
            seed: 0,
            include_obsolete: false,
        }
    }
}
