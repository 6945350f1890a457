//! On-disk layout of a run
//!
//! ```text
//! <root>/
//!   engine_config.json                  generated when none is supplied
//!   corpora/corpus_<iter>.json
//!   extraction_results/<iter>/          engine output
//!   extraction_results/<iter>/parsed_result.json
//!   deltas/delta_<a>_to_<b>.json
//!   deltas/delta_of_delta_<n>.json
//!   reports/final_report.json | partial_report.json
//! ```

use crate::error::ControllerError;
use crate::report::Report;
use plateau_domain::{Delta, DeltaOfDelta, ExtractionResult, IterationLabel};
use plateau_extractor::{EngineConfig, ExtractionRequest};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CORPORA: &str = "corpora";
const EXTRACTION_RESULTS: &str = "extraction_results";
const DELTAS: &str = "deltas";
const REPORTS: &str = "reports";
const PARSED_RESULT: &str = "parsed_result.json";

/// Writes run artifacts under an output directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`; nothing is written until [`prepare`](Self::prepare)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory layout
    pub fn prepare(&self) -> Result<(), ControllerError> {
        for dir in [CORPORA, EXTRACTION_RESULTS, DELTAS, REPORTS] {
            fs::create_dir_all(self.root.join(dir))?;
        }
        Ok(())
    }

    /// Manifest path of an iteration
    pub fn corpus_path(&self, iteration: &IterationLabel) -> PathBuf {
        self.root.join(CORPORA).join(format!("corpus_{}.json", iteration))
    }

    /// Engine output directory of an iteration
    pub fn extraction_dir(&self, iteration: &IterationLabel) -> PathBuf {
        self.root.join(EXTRACTION_RESULTS).join(iteration.to_string())
    }

    /// Normalized result of an iteration
    pub fn parsed_result_path(&self, iteration: &IterationLabel) -> PathBuf {
        self.extraction_dir(iteration).join(PARSED_RESULT)
    }

    /// Delta between two iterations
    pub fn delta_path(&self, from: &IterationLabel, to: &IterationLabel) -> PathBuf {
        self.root.join(DELTAS).join(format!("delta_{}_to_{}.json", from, to))
    }

    /// The `n`th delta-of-delta, 1-based
    pub fn delta_of_delta_path(&self, n: usize) -> PathBuf {
        self.root.join(DELTAS).join(format!("delta_of_delta_{}.json", n))
    }

    /// Final or partial report
    pub fn report_path(&self, complete: bool) -> PathBuf {
        let name = if complete { "final_report.json" } else { "partial_report.json" };
        self.root.join(REPORTS).join(name)
    }

    /// Generated engine configuration
    pub fn default_engine_config_path(&self) -> PathBuf {
        self.root.join("engine_config.json")
    }

    /// Where the engine reads and writes for an iteration
    pub fn request(&self, iteration: IterationLabel, engine_config_path: &Path) -> ExtractionRequest {
        ExtractionRequest {
            iteration,
            manifest_path: self.corpus_path(&iteration),
            output_dir: self.extraction_dir(&iteration),
            engine_config_path: engine_config_path.to_path_buf(),
        }
    }

    /// Write the default engine configuration and return its path
    pub fn write_default_engine_config(&self) -> Result<PathBuf, ControllerError> {
        let path = self.default_engine_config_path();
        EngineConfig::default().write(&path)?;
        Ok(path)
    }

    /// Persist a normalized extraction result
    pub fn write_result(&self, result: &ExtractionResult) -> Result<PathBuf, ControllerError> {
        let path = self.parsed_result_path(&result.iteration);
        write_json(&path, result)?;
        Ok(path)
    }

    /// Persist a delta
    pub fn write_delta(
        &self,
        from: &IterationLabel,
        to: &IterationLabel,
        delta: &Delta,
    ) -> Result<PathBuf, ControllerError> {
        let path = self.delta_path(from, to);
        write_json(&path, delta)?;
        Ok(path)
    }

    /// Persist the `n`th delta-of-delta
    pub fn write_delta_of_delta(&self, n: usize, dd: &DeltaOfDelta) -> Result<PathBuf, ControllerError> {
        let path = self.delta_of_delta_path(n);
        write_json(&path, dd)?;
        Ok(path)
    }

    /// Persist a report; complete runs go to `final_report.json`
    pub fn write_report(&self, report: &Report) -> Result<PathBuf, ControllerError> {
        let path = self.report_path(report.termination.is_complete());
        write_json(&path, report)?;
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ControllerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}
