//! Plateau Controller
//!
//! The Delta-of-Delta convergence loop. Documents arrive in significance
//! order; each iteration adds the next one to a cumulative corpus, runs the
//! extraction engine on it and compares the result with the previous one.
//! The run converges when the change between two consecutive deltas drops
//! below a threshold, and is exhausted when documents run out first.
//!
//! # Architecture
//!
//! ```text
//! Document[] → Controller ──► Corpus Builder → Extractor → ExtractionResult
//!                  │                                            │
//!                  └── RunState ◄── DeltaOfDelta ◄── Delta ◄────┘
//!                         │
//!                         └──► ArtifactStore (corpora/, extraction_results/, deltas/, reports/)
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use plateau_controller::{Controller, ControllerConfig};
//! use plateau_domain::Document;
//! use plateau_extractor::{CommandRunner, Extractor, ExtractorConfig};
//!
//! # async fn example() -> Result<(), plateau_controller::ControllerError> {
//! let documents = vec![
//!     Document::new("critique", "/corpus/critique.txt").with_significance(0.9),
//!     Document::new("groundwork", "/corpus/groundwork.txt").with_significance(0.7),
//! ];
//!
//! let config = ControllerConfig::default()
//!     .with_threshold(0.05)
//!     .with_output_dir("/tmp/plateau-run");
//! let extractor = Extractor::new(CommandRunner::new(), ExtractorConfig::default());
//!
//! let report = Controller::new(config, extractor).run(&documents).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifacts;
mod cancel;
mod config;
mod controller;
mod error;
mod report;
mod state;

pub use artifacts::ArtifactStore;
pub use cancel::CancellationFlag;
pub use config::{ControllerConfig, RunSelection};
pub use controller::Controller;
pub use error::ControllerError;
pub use report::{DeltaSummary, DocumentSummary, IterationSummary, Report, Termination};
pub use state::{RunPhase, RunState, SkippedDocument};

use plateau_domain::Document;
use plateau_extractor::{CommandRunner, Extractor, ExtractorConfig};
use std::path::Path;

/// Run the loop with the default engine invocation
///
/// Shorthand for a [`Controller`] over a [`CommandRunner`] with default
/// [`ExtractorConfig`] and [`ControllerConfig`] apart from the given values.
pub async fn run(
    documents: &[Document],
    output_dir: impl AsRef<Path>,
    threshold: f64,
    strategy_name: &str,
) -> Result<Report, ControllerError> {
    let config = ControllerConfig::default()
        .with_output_dir(output_dir.as_ref())
        .with_threshold(threshold)
        .with_strategy(strategy_name);
    let extractor = Extractor::new(CommandRunner::new(), ExtractorConfig::default());
    Controller::new(config, extractor).run(documents).await
}
