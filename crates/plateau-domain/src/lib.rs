//! Plateau Domain Layer
//!
//! Core data model and trait seams for the Delta-of-Delta convergence
//! analyzer. Every other crate in the workspace depends on the types defined
//! here; this crate depends on nothing but `serde`.
//!
//! ## Key Concepts
//!
//! - **Document**: A significance-ordered unit of input
//! - **Manifest**: The cumulative corpus handed to the extraction engine
//! - **Extraction Result**: Normalized engine output for one iteration
//! - **Delta**: Quantified change between two consecutive results
//! - **Delta-of-Delta**: Change between two consecutive deltas (the convergence signal)
//!
//! ## Determinism
//!
//! All keyed collections are `BTreeMap`/`BTreeSet`. Strategies iterate them in
//! key order, so floating-point accumulation order is fixed and the same pair
//! of results always yields bit-identical magnitudes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod delta;
pub mod document;
pub mod label;
pub mod manifest;
pub mod result;
pub mod selection;
pub mod strategy;
pub mod traits;

// Re-exports for convenience
pub use delta::{
    CompositeDetails, Delta, DeltaDetails, DeltaOfDelta, DocumentDistributionDetails,
    SemanticSimilarityDetails, TermWeightDetails, WeightChange,
};
pub use document::Document;
pub use label::{IterationLabel, LabelStyle};
pub use manifest::{Manifest, ManifestEntry, ManifestMetadata};
pub use result::{DocTermRecord, ExtractionResult, SimilarityMatrix, TermRecord};
pub use selection::{SelectionConstraints, SelectionStrategy};
pub use strategy::StrategyKind;
