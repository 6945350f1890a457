//! Configuration for a convergence run

use crate::error::ControllerError;
use plateau_diff::DiffConfig;
use plateau_domain::{LabelStyle, SelectionConstraints, SelectionStrategy, StrategyKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration of the convergence controller
///
/// # Examples
///
/// ```
/// use plateau_controller::ControllerConfig;
///
/// let config = ControllerConfig::default();
/// assert_eq!(config.threshold, 0.1);
/// assert_eq!(config.strategy, "composite");
///
/// let strict = ControllerConfig::default().with_threshold(0.01).with_strategy("term_weight");
/// assert!(strict.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Convergence threshold on the delta-of-delta magnitude
    /// Default: 0.1
    pub threshold: f64,

    /// Diff strategy name
    /// Default: composite
    pub strategy: String,

    /// How iteration labels are rendered
    /// Default: numeric
    pub label_style: LabelStyle,

    /// Upper bound on extraction invocations; unbounded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Root of every run artifact
    /// Default: delta_analysis_output
    pub output_dir: PathBuf,

    /// Engine configuration document; generated under `output_dir` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_config_path: Option<PathBuf>,

    /// Diff coefficients and composite weights
    pub diff: DiffConfig,

    /// How the document list was chosen, recorded in the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<RunSelection>,
}

/// Selector and criteria that produced a run's document list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSelection {
    /// Selection strategy
    pub strategy: SelectionStrategy,
    /// Filters and limits applied
    pub criteria: SelectionConstraints,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            strategy: StrategyKind::Composite.as_str().to_string(),
            label_style: LabelStyle::Numeric,
            max_iterations: None,
            output_dir: PathBuf::from("delta_analysis_output"),
            engine_config_path: None,
            diff: DiffConfig::default(),
            selection: None,
        }
    }
}

impl ControllerConfig {
    /// Set the convergence threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the strategy name
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = strategy.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Record the selection that produced the document list
    pub fn with_selection(mut self, strategy: SelectionStrategy, criteria: SelectionConstraints) -> Self {
        self.selection = Some(RunSelection { strategy, criteria });
        self
    }

    /// Resolve the strategy name
    pub fn strategy_kind(&self) -> Result<StrategyKind, ControllerError> {
        StrategyKind::from_name(&self.strategy).ok_or_else(|| {
            ControllerError::InvalidConfiguration(format!(
                "unknown strategy '{}' (expected one of {})",
                self.strategy,
                StrategyKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ControllerError> {
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ControllerError::InvalidConfiguration(format!(
                "threshold must be a positive number, got {}",
                self.threshold
            )));
        }
        self.strategy_kind()?;
        if self.max_iterations == Some(0) {
            return Err(ControllerError::InvalidConfiguration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ControllerError::InvalidConfiguration(
                "output_dir must not be empty".to_string(),
            ));
        }
        self.diff
            .validate()
            .map_err(|e| ControllerError::InvalidConfiguration(e.to_string()))
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ControllerError> {
        toml::from_str(toml_str)
            .map_err(|e| ControllerError::InvalidConfiguration(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ControllerError> {
        toml::to_string_pretty(self)
            .map_err(|e| ControllerError::Serialization(format!("Failed to serialize to TOML: {}", e)))
    }
}
