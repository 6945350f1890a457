//! Configuration for the Extraction Invocation Adapter

use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// File names of the engine's output artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    /// Corpus-level term list (required)
    pub terms: String,
    /// Document-term associations (required)
    pub doc_terms: String,
    /// Author-term associations (optional)
    pub author_terms: String,
    /// Term similarity matrix (optional)
    pub term_similarity: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            terms: "terms.json".to_string(),
            doc_terms: "doc-terms.json".to_string(),
            author_terms: "author-terms.json".to_string(),
            term_similarity: "term-sim.json".to_string(),
        }
    }
}

/// Exponential backoff for engine failures
///
/// The default performs no retries: engine failures are treated as
/// non-transient unless the caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry (milliseconds)
    pub initial_backoff_ms: u64,
    /// Upper bound of the doubled delay (milliseconds)
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_retries` retries and the default backoff
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Engine executable, invoked as `<entrypoint> <manifest> <output> <config> [extra_args]`
    pub entrypoint: PathBuf,

    /// Arguments appended after the three positional arguments
    pub extra_args: Vec<String>,

    /// Directory the engine runs in (the engine's install directory)
    pub working_dir: Option<PathBuf>,

    /// Maximum time for one engine invocation (seconds); no timeout when unset
    pub timeout_secs: Option<u64>,

    /// Retry policy for engine failures
    pub retry: RetryPolicy,

    /// Output artifact file names
    pub artifacts: ArtifactNames,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            entrypoint: PathBuf::from("./saffron.sh"),
            // Taxonomy-only run: skips knowledge-graph construction
            extra_args: vec!["-k".to_string(), "TAXO".to_string()],
            working_dir: None,
            timeout_secs: None,
            retry: RetryPolicy::default(),
            artifacts: ArtifactNames::default(),
        }
    }
}

impl ExtractorConfig {
    /// Configuration for an entrypoint with no extra arguments
    pub fn for_entrypoint(entrypoint: impl Into<PathBuf>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            extra_args: Vec::new(),
            ..Self::default()
        }
    }

    /// Get the invocation timeout as a Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.entrypoint.as_os_str().is_empty() {
            return Err(ExtractionError::Config("entrypoint must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(ExtractionError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ExtractionError::Config(
                "retry.initial_backoff_ms cannot exceed retry.max_backoff_ms".to_string(),
            ));
        }
        let names = [
            &self.artifacts.terms,
            &self.artifacts.doc_terms,
            &self.artifacts.author_terms,
            &self.artifacts.term_similarity,
        ];
        if names.iter().any(|n| n.is_empty()) {
            return Err(ExtractionError::Config(
                "artifact file names must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractionError> {
        toml::from_str(toml_str)
            .map_err(|e| ExtractionError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractionError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractionError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.timeout().is_none());
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ExtractorConfig {
            timeout_secs: Some(0),
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_artifact_name_rejected() {
        let mut config = ExtractorConfig::default();
        config.artifacts.terms.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_backoff_ms: 100,
            max_backoff_ms: 350,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.backoff(40), Duration::from_millis(350));
    }

    #[test]
    fn test_partial_toml() {
        let config = ExtractorConfig::from_toml(
            r#"
            entrypoint = "/opt/saffron/saffron.sh"
            working_dir = "/opt/saffron"
            timeout_secs = 600

            [retry]
            max_retries = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.entrypoint, PathBuf::from("/opt/saffron/saffron.sh"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.initial_backoff_ms, 1_000);
        assert_eq!(config.artifacts, ArtifactNames::default());
        assert_eq!(config.extra_args, vec!["-k", "TAXO"]);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            timeout_secs: Some(30),
            ..ExtractorConfig::for_entrypoint("/bin/engine")
        };
        let parsed = ExtractorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
