//! Run state of the convergence loop
//!
//! Histories are append-only: the controller can push onto them but nothing
//! can rewrite or drop an element, and callers only get slices.

use plateau_domain::{Delta, DeltaOfDelta, Document, ExtractionResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Phase of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Configuration validated, nothing extracted yet
    Init,
    /// At least one iteration done, more documents remain
    Iterating,
    /// A delta-of-delta fell below the threshold
    Converged,
    /// Documents or the iteration budget ran out
    Exhausted,
}

impl RunPhase {
    /// Whether the phase is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Converged | RunPhase::Exhausted)
    }
}

/// A document left out of every corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedDocument {
    /// Document id
    pub id: String,
    /// Path that could not be used
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Everything a run has produced so far
#[derive(Debug, Clone)]
pub struct RunState {
    phase: RunPhase,
    processed: Vec<Document>,
    skipped: Vec<SkippedDocument>,
    results: Vec<ExtractionResult>,
    deltas: Vec<Delta>,
    delta_of_deltas: Vec<DeltaOfDelta>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    /// Fresh state in [`RunPhase::Init`]
    pub fn new() -> Self {
        Self {
            phase: RunPhase::Init,
            processed: Vec::new(),
            skipped: Vec::new(),
            results: Vec::new(),
            deltas: Vec::new(),
            delta_of_deltas: Vec::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Documents in the corpus, in significance order
    pub fn processed(&self) -> &[Document] {
        &self.processed
    }

    /// Documents that were skipped
    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }

    /// One result per completed iteration
    pub fn results(&self) -> &[ExtractionResult] {
        &self.results
    }

    /// Delta history
    pub fn deltas(&self) -> &[Delta] {
        &self.deltas
    }

    /// Delta-of-delta history
    pub fn delta_of_deltas(&self) -> &[DeltaOfDelta] {
        &self.delta_of_deltas
    }

    /// Most recent delta-of-delta
    pub fn last_delta_of_delta(&self) -> Option<&DeltaOfDelta> {
        self.delta_of_deltas.last()
    }

    /// Number of completed iterations
    pub fn iterations(&self) -> usize {
        self.results.len()
    }

    pub(crate) fn record_skip(&mut self, skipped: SkippedDocument) {
        self.skipped.push(skipped);
    }

    /// Record a completed iteration: the document that joined the corpus and
    /// the resulting extraction
    pub(crate) fn record_iteration(&mut self, document: Document, result: ExtractionResult) {
        self.processed.push(document);
        self.results.push(result);
        if self.phase == RunPhase::Init {
            self.phase = RunPhase::Iterating;
        }
    }

    pub(crate) fn record_delta(&mut self, delta: Delta) {
        self.deltas.push(delta);
    }

    pub(crate) fn record_delta_of_delta(&mut self, dd: DeltaOfDelta) {
        self.delta_of_deltas.push(dd);
    }

    /// The two most recent results, oldest first
    pub(crate) fn last_two_results(&self) -> Option<(&ExtractionResult, &ExtractionResult)> {
        match self.results.as_slice() {
            [.., a, b] => Some((a, b)),
            _ => None,
        }
    }

    /// The two most recent deltas, oldest first
    pub(crate) fn last_two_deltas(&self) -> Option<(&Delta, &Delta)> {
        match self.deltas.as_slice() {
            [.., a, b] => Some((a, b)),
            _ => None,
        }
    }

    pub(crate) fn finish(&mut self, phase: RunPhase) {
        debug_assert!(phase.is_terminal());
        self.phase = phase;
    }
}
