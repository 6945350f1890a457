//! Trait definitions for the analyzer's seams
//!
//! Implementations live in other crates: diff strategies in `plateau-diff`,
//! the catalog-backed selector in `plateau-corpus`.

use crate::{Delta, Document, ExtractionResult, SelectionConstraints, SelectionStrategy, StrategyKind};

/// Compares two extraction results
///
/// Implementations must be pure: no I/O, no interior mutability, and the same
/// pair of inputs must always produce the same delta. Persisting deltas is the
/// controller's job.
pub trait DiffStrategy: Send + Sync {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Compute the delta from `a` (earlier) to `b` (later)
    fn compute(&self, a: &ExtractionResult, b: &ExtractionResult) -> Delta;
}

/// Supplies documents in significance order
///
/// The returned list must be a stable total order: ties are broken by a
/// deterministic secondary key so runs are reproducible.
pub trait DocumentSelector {
    /// Error type for selection
    type Error;

    /// Select and order documents
    fn select(
        &self,
        strategy: SelectionStrategy,
        constraints: &SelectionConstraints,
    ) -> Result<Vec<Document>, Self::Error>;
}
