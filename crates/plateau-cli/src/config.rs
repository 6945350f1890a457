//! Configuration management for the CLI.
//!
//! ```toml
//! [engine]
//! entrypoint = "./saffron.sh"
//! working_dir = "/opt/saffron"
//!
//! [analysis]
//! threshold = 0.1
//! strategy = "composite"
//!
//! [diff.composite_weights]
//! term_weight = 0.4
//!
//! [selection]
//! strategy = "by_score"
//! max_documents = 50
//!
//! [settings]
//! color = true
//! format = "table"
//! ```

use crate::error::{CliError, Result};
use plateau_controller::ControllerConfig;
use plateau_diff::DiffConfig;
use plateau_domain::{LabelStyle, SelectionConstraints, SelectionStrategy};
use plateau_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Engine invocation
    #[serde(default)]
    pub engine: ExtractorConfig,

    /// Convergence settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Diff coefficients
    #[serde(default)]
    pub diff: DiffConfig,

    /// Document selection defaults
    #[serde(default)]
    pub selection: SelectionSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Convergence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Delta-of-delta threshold
    pub threshold: f64,

    /// Diff strategy name
    pub strategy: String,

    /// Iteration label style
    pub label_style: LabelStyle,

    /// Maximum number of extraction runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Engine configuration document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_config: Option<PathBuf>,
}

/// Document selection defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Selection strategy
    pub strategy: SelectionStrategy,

    /// Maximum number of documents
    pub max_documents: usize,

    /// Minimum score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,

    /// Seed for the random strategy
    pub seed: u64,

    /// Keep documents flagged obsolete
    pub include_obsolete: bool,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".plateau").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default path.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.diff.validate()?;
        self.controller_config()
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        if self.selection.max_documents == 0 {
            return Err(CliError::Config("selection.max_documents must be at least 1".into()));
        }
        Ok(())
    }

    /// Controller configuration from the `[analysis]` and `[diff]` sections.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            threshold: self.analysis.threshold,
            strategy: self.analysis.strategy.clone(),
            label_style: self.analysis.label_style,
            max_iterations: self.analysis.max_iterations,
            output_dir: self.analysis.output_dir.clone(),
            engine_config_path: self.analysis.engine_config.clone(),
            diff: self.diff.clone(),
            selection: None,
        }
    }

    /// Selection constraints from the `[selection]` section.
    pub fn constraints(&self) -> SelectionConstraints {
        SelectionConstraints {
            min_score: self.selection.min_score,
            max_documents: self.selection.max_documents,
            seed: self.selection.seed,
            include_obsolete: self.selection.include_obsolete,
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        let controller = ControllerConfig::default();
        Self {
            threshold: controller.threshold,
            strategy: controller.strategy,
            label_style: controller.label_style,
            max_iterations: controller.max_iterations,
            output_dir: controller.output_dir,
            engine_config: controller.engine_config_path,
        }
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        let constraints = SelectionConstraints::default();
        Self {
            strategy: SelectionStrategy::default(),
            max_documents: constraints.max_documents,
            min_score: constraints.min_score,
            seed: constraints.seed,
            include_obsolete: constraints.include_obsolete,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.threshold, 0.1);
        assert_eq!(config.selection.max_documents, 50);
        assert!(config.settings.color);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.analysis.strategy = "semantic_similarity".to_string();
        config.engine.working_dir = Some("/opt/saffron".into());
        config.selection.strategy = SelectionStrategy::Recent;
        config.settings.format = OutputFormat::Json;

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[analysis]
threshold = 0.02

[selection]
strategy = "mixed"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.analysis.threshold, 0.02);
        assert_eq!(config.analysis.strategy, "composite");
        assert_eq!(config.selection.strategy, SelectionStrategy::Mixed);
        assert_eq!(config.engine, ExtractorConfig::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[analysis]\nstrategy = \"cosine\"\n").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(CliError::Config(_))));
    }
}
