//! Plateau Diff Strategy Library
//!
//! Pure functions that compare two extraction results and produce a scalar
//! magnitude plus structured detail.
//!
//! # Strategies
//!
//! | Name | Magnitude |
//! |------|-----------|
//! | `term_weight` | `0.6 * structural_change + 0.4 * weight_change_magnitude` |
//! | `semantic_similarity` | `0.3 * jaccard_distance + 0.7 * semantic_distance` (Jaccard only without similarity matrices) |
//! | `document_distribution` | `0.4 * entropy_change + 0.3 * doc_structural_change + 0.3 * distribution_changes` |
//! | `composite` | `Σ weight[s] * magnitude[s]`, default weights 0.4 / 0.3 / 0.3 |
//!
//! The coefficients are defaults of [`DiffConfig`] and can be overridden.
//!
//! # Example
//!
//! ```
//! use plateau_diff::{DiffConfig, Strategy};
//! use plateau_domain::traits::DiffStrategy;
//! use plateau_domain::{ExtractionResult, IterationLabel};
//!
//! let a = ExtractionResult::empty(IterationLabel::numeric(1), "/tmp/1");
//! let b = ExtractionResult::empty(IterationLabel::numeric(2), "/tmp/2");
//!
//! let strategy = Strategy::from_name("term_weight", &DiffConfig::default()).unwrap();
//! let delta = strategy.compute(&a, &b);
//! assert_eq!(delta.comparison, "1 -> 2");
//! assert_eq!(delta.magnitude, 0.0);
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod math;
mod term_weight;
mod semantic;
mod distribution;
mod composite;
mod strategy;


pub use error::DiffError;
pub use config::{
    DiffConfig, DistributionCoefficients, SemanticCoefficients, TermWeightCoefficients,
};
pub use term_weight::TermWeightStrategy;
pub use semantic::SemanticSimilarityStrategy;
pub use distribution::DocumentDistributionStrategy;
pub use composite::CompositeStrategy;
pub use strategy::Strategy;
pub use math::{cosine_similarity, jaccard_distance, shannon_entropy};
