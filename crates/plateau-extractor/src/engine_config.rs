//! Engine configuration document
//!
//! The JSON document passed as the engine's third positional argument. The
//! typed sections cover the settings this analyzer cares about; everything
//! else is carried through untouched in `extra` maps.

use crate::error::ExtractionError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

/// Term extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TermExtractionConfig {
    /// Minimum term score
    pub threshold: f64,
    /// Maximum number of terms returned
    pub max_terms: u32,
    /// Shortest n-gram considered
    pub ngram_min: u32,
    /// Longest n-gram considered
    pub ngram_max: u32,
    /// Minimum corpus frequency of a term
    pub min_term_freq: u32,
    /// Maximum number of documents read
    pub max_docs: u64,
    /// Ranking method
    pub method: String,
    /// Scoring features combined by the ranking method
    pub features: Vec<String>,
    /// Feature used as the base score
    pub base_feature: String,
    /// Engine-specific settings not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TermExtractionConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            max_terms: 100,
            ngram_min: 1,
            ngram_max: 4,
            min_term_freq: 2,
            max_docs: i32::MAX as u64,
            method: "voting".to_string(),
            features: ["comboBasic", "weirdness", "totalTfIdf", "cValue", "residualIdf"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            base_feature: "comboBasic".to_string(),
            extra: Map::new(),
        }
    }
}

/// Author-term association settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorTermConfig {
    /// Terms kept per author
    pub top_n: u32,
    /// Minimum documents an author must appear in
    pub min_docs: u32,
}

impl Default for AuthorTermConfig {
    fn default() -> Self {
        Self { top_n: 100, min_docs: 1 }
    }
}

/// Term similarity settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TermSimConfig {
    /// Minimum similarity kept in the matrix
    pub threshold: f64,
    /// Neighbours kept per term
    pub top_n: u32,
}

impl Default for TermSimConfig {
    fn default() -> Self {
        Self { threshold: 0.1, top_n: 50 }
    }
}

/// Taxonomy construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxonomyConfig {
    /// Emit RDF instead of JSON
    #[serde(rename = "returnRDF")]
    pub return_rdf: bool,
    /// Negative sampling rate
    pub neg_sampling: f64,
    /// Search parameters and model files, left to the engine's defaults
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            return_rdf: false,
            neg_sampling: 5.0,
            extra: Map::new(),
        }
    }
}

/// Complete engine configuration document
///
/// # Examples
///
/// ```
/// use plateau_extractor::EngineConfig;
///
/// let config = EngineConfig::default();
/// let json = config.to_json().unwrap();
/// assert!(json.contains("\"termExtraction\""));
/// assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Term extraction
    #[serde(default)]
    pub term_extraction: TermExtractionConfig,
    /// Author-term associations
    #[serde(default)]
    pub author_term: AuthorTermConfig,
    /// Term similarity
    #[serde(default)]
    pub term_sim: TermSimConfig,
    /// Taxonomy construction
    #[serde(default)]
    pub taxonomy: TaxonomyConfig,
    /// Other sections (`authorSim`, `kg`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for EngineConfig {
    /// Term extraction and taxonomy only; knowledge-graph models disabled
    fn default() -> Self {
        let extra = json!({
            "authorSim": { "threshold": 0.1, "topN": 50 },
            "kg": {
                "kerasModelFile": "/dev/null",
                "bertModelFile": "/dev/null",
                "numberOfRelations": 0,
                "synonymyThreshold": 0.999,
                "meronomyThreshold": 0.999,
                "enableSynonymyNormalisation": false,
                "returnRDF": false
            }
        });
        Self {
            term_extraction: TermExtractionConfig::default(),
            author_term: AuthorTermConfig::default(),
            term_sim: TermSimConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            extra: as_object(extra),
        }
    }
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractionError> {
        let te = &self.term_extraction;
        if te.ngram_min == 0 {
            return Err(ExtractionError::Config("ngramMin must be at least 1".to_string()));
        }
        if te.ngram_max < te.ngram_min {
            return Err(ExtractionError::Config(format!(
                "ngramMax ({}) cannot be less than ngramMin ({})",
                te.ngram_max, te.ngram_min
            )));
        }
        if te.max_terms == 0 {
            return Err(ExtractionError::Config("maxTerms must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.term_sim.threshold) {
            return Err(ExtractionError::Config(format!(
                "termSim.threshold must be within [0, 1], got {}",
                self.term_sim.threshold
            )));
        }
        Ok(())
    }

    /// Parse a configuration document
    pub fn from_json(json: &str) -> Result<Self, ExtractionError> {
        serde_json::from_str(json)
            .map_err(|e| ExtractionError::Config(format!("Failed to parse engine config: {}", e)))
    }

    /// Serialize the configuration document
    pub fn to_json(&self) -> Result<String, ExtractionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration document from disk
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Write the configuration document to disk, creating parent directories
    pub fn write(&self, path: &Path) -> Result<(), ExtractionError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
