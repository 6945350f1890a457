//! Run reports

use crate::config::ControllerConfig;
use crate::state::{RunState, SkippedDocument};
use plateau_domain::{
    DeltaOfDelta, IterationLabel, SelectionConstraints, SelectionStrategy, StrategyKind,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A delta-of-delta fell below the threshold
    Converged,
    /// Documents or the iteration budget ran out first
    Exhausted,
    /// The engine failed; only written to a partial report
    Aborted,
    /// The cancellation flag was set; only written to a partial report
    Cancelled,
}

impl Termination {
    /// Whether the run completed rather than stopping early
    pub fn is_complete(&self) -> bool {
        matches!(self, Termination::Converged | Termination::Exhausted)
    }
}

/// A document that joined the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document id
    pub id: String,
    /// Display name
    pub name: String,
    /// Source path
    pub path: PathBuf,
    /// Significance score
    pub significance: f64,
}

/// Per-iteration figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    /// Iteration label
    pub iteration: IterationLabel,
    /// Corpus size
    pub documents_in_corpus: usize,
    /// Distinct terms extracted
    pub term_count: usize,
    /// Documents with at least one term
    pub document_count: usize,
}

/// One entry of the delta series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSummary {
    /// Comparison label
    pub comparison: String,
    /// Strategy that produced the delta
    pub strategy: StrategyKind,
    /// Delta magnitude
    pub magnitude: f64,
}

/// Summary of a run, written to `reports/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique run id
    pub run_id: Uuid,
    /// Whether the run converged
    pub converged: bool,
    /// How the run ended
    pub termination: Termination,
    /// Iteration at which it converged
    pub converged_at: Option<IterationLabel>,
    /// Threshold in effect
    pub threshold: f64,
    /// Strategy in effect
    pub strategy: StrategyKind,
    /// Selector that ranked the documents, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_strategy: Option<SelectionStrategy>,
    /// Criteria the selector applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_criteria: Option<SelectionConstraints>,
    /// Number of documents handed to the run
    pub documents_supplied: usize,
    /// Documents that joined the corpus, in order
    pub documents_processed: Vec<DocumentSummary>,
    /// Documents left out
    pub skipped: Vec<SkippedDocument>,
    /// Per-iteration figures
    pub iterations: Vec<IterationSummary>,
    /// Delta magnitude series
    pub deltas: Vec<DeltaSummary>,
    /// Delta-of-delta series
    pub delta_of_deltas: Vec<DeltaOfDelta>,
    /// Last delta-of-delta, if any
    pub final_delta_of_delta: Option<DeltaOfDelta>,
    /// Error text of an aborted run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Seconds since the Unix epoch
    pub generated_at: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl Report {
    /// Build a report from the run state
    pub(crate) fn from_state(
        run_id: Uuid,
        state: &RunState,
        config: &ControllerConfig,
        strategy: StrategyKind,
        documents_supplied: usize,
        termination: Termination,
        error: Option<String>,
    ) -> Self {
        let converged = termination == Termination::Converged;
        let iterations = state
            .results()
            .iter()
            .enumerate()
            .map(|(i, result)| IterationSummary {
                iteration: result.iteration,
                documents_in_corpus: i + 1,
                term_count: result.term_count(),
                document_count: result.document_count(),
            })
            .collect();

        Self {
            run_id,
            converged,
            termination,
            converged_at: if converged {
                state.results().last().map(|r| r.iteration)
            } else {
                None
            },
            threshold: config.threshold,
            strategy,
            selection_strategy: config.selection.as_ref().map(|s| s.strategy),
            selection_criteria: config.selection.as_ref().map(|s| s.criteria.clone()),
            documents_supplied,
            documents_processed: state
                .processed()
                .iter()
                .map(|d| DocumentSummary {
                    id: d.id.clone(),
                    name: d.display_name(),
                    path: d.path.clone(),
                    significance: d.significance,
                })
                .collect(),
            skipped: state.skipped().to_vec(),
            iterations,
            deltas: state
                .deltas()
                .iter()
                .map(|d| DeltaSummary {
                    comparison: d.comparison.clone(),
                    strategy: d.strategy,
                    magnitude: d.magnitude,
                })
                .collect(),
            delta_of_deltas: state.delta_of_deltas().to_vec(),
            final_delta_of_delta: state.last_delta_of_delta().cloned(),
            error,
            generated_at: unix_now(),
        }
    }

    /// Number of completed iterations
    pub fn iteration_count(&self) -> usize {
        self.iterations.len()
    }

    /// Term count of every iteration, in order
    pub fn term_counts(&self) -> Vec<usize> {
        self.iterations.iter().map(|i| i.term_count).collect()
    }

    /// Get a summary report as a string
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Convergence Run Summary".to_string(),
            "=======================".to_string(),
            format!("Run: {}", self.run_id),
            format!("Strategy: {} (threshold {})", self.strategy, self.threshold),
            format!(
                "Documents: {} supplied, {} processed, {} skipped",
                self.documents_supplied,
                self.documents_processed.len(),
                self.skipped.len()
            ),
            format!("Iterations: {}", self.iteration_count()),
        ];
        if let (Some(strategy), Some(criteria)) = (self.selection_strategy, &self.selection_criteria) {
            lines.push(format!(
                "Selection: {} (max {}, seed {})",
                strategy.as_str(),
                criteria.max_documents,
                criteria.seed
            ));
        }
        lines.push(String::new());

        if !self.deltas.is_empty() {
            lines.push("Deltas:".to_string());
            for delta in &self.deltas {
                lines.push(format!("  {}: {:.6}", delta.comparison, delta.magnitude));
            }
            lines.push(String::new());
        }

        if !self.delta_of_deltas.is_empty() {
            lines.push("Delta of deltas:".to_string());
            for dd in &self.delta_of_deltas {
                lines.push(format!("  {}: {:.6}", dd.comparison, dd.magnitude));
            }
            lines.push(String::new());
        }

        let outcome = match (self.termination, self.converged_at) {
            (Termination::Converged, Some(at)) => format!("Converged at iteration {}", at),
            (Termination::Converged, None) => "Converged".to_string(),
            (Termination::Exhausted, _) => "Not converged: documents exhausted".to_string(),
            (Termination::Aborted, _) => "Aborted".to_string(),
            (Termination::Cancelled, _) => "Cancelled".to_string(),
        };
        lines.push(outcome);
        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }

        lines.join("\n")
    }
}
