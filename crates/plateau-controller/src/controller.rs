//! The convergence loop

use crate::artifacts::ArtifactStore;
use crate::cancel::CancellationFlag;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::report::{Report, Termination};
use crate::state::{RunPhase, RunState, SkippedDocument};
use plateau_corpus::{assemble_manifest, check_document, CorpusError};
use plateau_diff::Strategy;
use plateau_domain::traits::DiffStrategy;
use plateau_domain::{DeltaOfDelta, Document, IterationLabel, StrategyKind};
use plateau_extractor::{EngineConfig, EngineRunner, Extractor};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Grows a corpus one document at a time until the delta of deltas settles
///
/// Iteration `k` extracts terms from the `k` most significant usable
/// documents. From iteration 2 on, the result is diffed against the previous
/// one; from iteration 3 on, the two latest deltas are compared and the run
/// converges once that change falls below the threshold.
pub struct Controller<R: EngineRunner> {
    config: ControllerConfig,
    extractor: Extractor<R>,
    cancel: CancellationFlag,
}

/// Context of one run, threaded through the loop
struct Run<'a> {
    id: Uuid,
    store: ArtifactStore,
    strategy: Strategy,
    kind: StrategyKind,
    documents_supplied: usize,
    config: &'a ControllerConfig,
    state: RunState,
}

impl Run<'_> {
    fn report(&self, termination: Termination, error: Option<String>) -> Report {
        Report::from_state(
            self.id,
            &self.state,
            self.config,
            self.kind,
            self.documents_supplied,
            termination,
            error,
        )
    }

    /// Persist a partial report without masking the error that ended the run
    fn write_partial(&self, termination: Termination, err: &ControllerError) {
        let report = self.report(termination, Some(err.to_string()));
        match self.store.write_report(&report) {
            Ok(path) => info!(path = %path.display(), "wrote partial report"),
            Err(e) => error!(error = %e, "failed to write partial report"),
        }
    }
}

impl<R: EngineRunner> Controller<R> {
    /// Create a controller
    pub fn new(config: ControllerConfig, extractor: Extractor<R>) -> Self {
        Self {
            config,
            extractor,
            cancel: CancellationFlag::new(),
        }
    }

    /// Use an externally owned cancellation flag
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// A handle that cancels this controller's runs
    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    /// Reject unusable input before anything touches the disk
    fn validate(&self, documents: &[Document]) -> Result<StrategyKind, ControllerError> {
        if documents.is_empty() {
            return Err(ControllerError::InvalidConfiguration(
                "document list is empty".to_string(),
            ));
        }
        self.config.validate()?;
        self.extractor
            .config()
            .validate()
            .map_err(|e| ControllerError::InvalidConfiguration(e.to_string()))?;
        if let Some(path) = &self.config.engine_config_path {
            EngineConfig::load(path)
                .and_then(|c| c.validate())
                .map_err(|e| {
                    ControllerError::InvalidConfiguration(format!(
                        "engine config {}: {}",
                        path.display(),
                        e
                    ))
                })?;
        }
        self.config.strategy_kind()
    }

    /// Run the loop over documents in significance order
    ///
    /// # Errors
    ///
    /// - [`ControllerError::InvalidConfiguration`] before any work starts
    /// - [`ControllerError::Extraction`] when the engine fails; a partial
    ///   report is left in `reports/`
    /// - [`ControllerError::Cancelled`] when the cancellation flag is set
    pub async fn run(&self, documents: &[Document]) -> Result<Report, ControllerError> {
        let kind = self.validate(documents)?;

        let mut run = Run {
            id: Uuid::now_v7(),
            store: ArtifactStore::new(&self.config.output_dir),
            strategy: Strategy::from_kind(kind, &self.config.diff),
            kind,
            documents_supplied: documents.len(),
            config: &self.config,
            state: RunState::new(),
        };

        info!(
            run_id = %run.id,
            documents = documents.len(),
            threshold = self.config.threshold,
            strategy = %kind,
            output_dir = %self.config.output_dir.display(),
            "starting convergence run"
        );

        run.store.prepare()?;
        let engine_config_path = match &self.config.engine_config_path {
            Some(path) => path.clone(),
            None => run.store.write_default_engine_config()?,
        };

        match self.iterate(&mut run, documents, &engine_config_path).await {
            Ok(phase) => {
                run.state.finish(phase);
                let termination = match phase {
                    RunPhase::Converged => Termination::Converged,
                    _ => Termination::Exhausted,
                };
                let report = run.report(termination, None);
                let path = run.store.write_report(&report)?;
                info!(
                    converged = report.converged,
                    iterations = report.iteration_count(),
                    path = %path.display(),
                    "run finished"
                );
                Ok(report)
            }
            Err(err) => {
                let termination = if matches!(err, ControllerError::Cancelled) {
                    Termination::Cancelled
                } else {
                    Termination::Aborted
                };
                error!(error = %err, iterations = run.state.iterations(), "run stopped");
                run.write_partial(termination, &err);
                Err(err)
            }
        }
    }

    /// Drive the state machine until a terminal phase or an error
    async fn iterate(
        &self,
        run: &mut Run<'_>,
        documents: &[Document],
        engine_config_path: &Path,
    ) -> Result<RunPhase, ControllerError> {
        let mut label = IterationLabel::new(1, self.config.label_style);
        // files resolved when each document joined the corpus
        let mut corpus: Vec<(Document, PathBuf)> = Vec::new();

        for document in documents {
            if let Some(limit) = self.config.max_iterations {
                if run.state.iterations() >= limit {
                    info!(limit, "iteration budget reached");
                    return Ok(RunPhase::Exhausted);
                }
            }

            let file = match check_document(document) {
                Ok(file) => file,
                Err(CorpusError::DocumentNotFound { id, path }) => {
                    warn!(id = %id, path = %path.display(), "document not found, skipping");
                    run.state.record_skip(SkippedDocument {
                        id,
                        path,
                        reason: "document not found".to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if self.cancel.is_cancelled() {
                info!(iteration = %label, "cancellation requested");
                return Err(ControllerError::Cancelled);
            }

            corpus.push((document.clone(), file));
            let manifest = assemble_manifest(&corpus, &label);
            let request = run.store.request(label, engine_config_path);

            info!(iteration = %label, documents = corpus.len(), added = %document.id, "iteration");
            let result = self.extractor.run_extraction(&manifest, &request).await?;
            run.store.write_result(&result)?;
            info!(iteration = %label, terms = result.term_count(), "extraction complete");
            run.state.record_iteration(document.clone(), result);

            if let Some((previous, current)) = run.state.last_two_results() {
                let delta = run.strategy.compute(previous, current);
                run.store
                    .write_delta(&previous.iteration, &current.iteration, &delta)?;
                info!(comparison = %delta.comparison, magnitude = delta.magnitude, "delta");
                run.state.record_delta(delta);
            }

            if let Some((previous, current)) = run.state.last_two_deltas() {
                let dd = DeltaOfDelta::between(previous, current);
                let n = run.state.delta_of_deltas().len() + 1;
                run.store.write_delta_of_delta(n, &dd)?;
                info!(
                    comparison = %dd.comparison,
                    magnitude = dd.magnitude,
                    threshold = self.config.threshold,
                    "delta of delta"
                );
                let converged = dd.magnitude < self.config.threshold;
                run.state.record_delta_of_delta(dd);
                if converged {
                    info!(iteration = %label, "converged");
                    return Ok(RunPhase::Converged);
                }
            }

            label = label.next();
        }

        debug!(
            processed = run.state.processed().len(),
            skipped = run.state.skipped().len(),
            "documents exhausted"
        );
        info!(iterations = run.state.iterations(), "documents exhausted without convergence");
        Ok(RunPhase::Exhausted)
    }
}
