//! Plateau Extractor
//!
//! The Extraction Invocation Adapter: runs the external term-extraction
//! engine on a manifest and normalizes its output artifacts into an
//! [`ExtractionResult`](plateau_domain::ExtractionResult).
//!
//! # Architecture
//!
//! ```text
//! Manifest → Extractor → EngineRunner (subprocess) → artifacts → parser → ExtractionResult
//! ```
//!
//! The [`EngineRunner`] trait is the seam: [`CommandRunner`] spawns the real
//! engine, [`MockRunner`] writes scripted artifacts for tests.
//!
//! # Example Usage
//!
//! ```no_run
//! use plateau_extractor::{CommandRunner, ExtractionRequest, Extractor, ExtractorConfig};
//! use plateau_domain::{IterationLabel, Manifest};
//!
//! # async fn example(manifest: Manifest) -> Result<(), plateau_extractor::ExtractionError> {
//! let config = ExtractorConfig {
//!     working_dir: Some("/opt/saffron".into()),
//!     timeout_secs: Some(900),
//!     ..ExtractorConfig::default()
//! };
//! let extractor = Extractor::new(CommandRunner::new(), config);
//!
//! let request = ExtractionRequest {
//!     iteration: IterationLabel::numeric(1),
//!     manifest_path: "/tmp/run/corpora/corpus_1.json".into(),
//!     output_dir: "/tmp/run/extraction_results/1".into(),
//!     engine_config_path: "/tmp/run/engine_config.json".into(),
//! };
//! let result = extractor.run_extraction(&manifest, &request).await?;
//! println!("{} terms", result.term_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod engine_config;
mod runner;
mod parser;
mod extractor;

pub use error::ExtractionError;
pub use config::{ArtifactNames, ExtractorConfig, RetryPolicy};
pub use engine_config::{
    AuthorTermConfig, EngineConfig, TaxonomyConfig, TermExtractionConfig, TermSimConfig,
};
pub use runner::{CommandRunner, EngineInvocation, EngineOutput, EngineRunner, MockOutput, MockRunner};
pub use parser::parse_artifacts;
pub use extractor::{ExtractionRequest, Extractor};
