//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::parser::parse_artifacts;
use crate::runner::{EngineInvocation, EngineOutput, EngineRunner};
use plateau_corpus::write_manifest;
use plateau_domain::{ExtractionResult, IterationLabel, Manifest};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Where one extraction reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Iteration the corpus belongs to
    pub iteration: IterationLabel,
    /// Where the manifest is written
    pub manifest_path: PathBuf,
    /// Engine output directory; cleared before every attempt
    pub output_dir: PathBuf,
    /// Engine configuration document
    pub engine_config_path: PathBuf,
}

/// Runs the external engine on a manifest and normalizes its output
pub struct Extractor<R: EngineRunner> {
    runner: R,
    config: ExtractorConfig,
}

fn absolute(path: &Path) -> Result<PathBuf, ExtractionError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Remove and recreate a directory so every attempt starts clean
async fn reset_dir(dir: &Path) -> Result<(), ExtractionError> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

impl<R: EngineRunner> Extractor<R> {
    /// Create a new Extractor
    pub fn new(runner: R, config: ExtractorConfig) -> Self {
        Self { runner, config }
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The engine runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the engine on a manifest
    ///
    /// Writes the manifest, clears the output directory, invokes the engine
    /// and parses its artifacts. Safe to call again with the same request.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::Engine`] when the engine fails, including on
    ///   timeout, once the retry policy is exhausted
    /// - [`ExtractionError::MalformedOutput`] when a required artifact
    ///   cannot be parsed
    pub async fn run_extraction(
        &self,
        manifest: &Manifest,
        request: &ExtractionRequest,
    ) -> Result<ExtractionResult, ExtractionError> {
        write_manifest(manifest, &request.manifest_path)?;

        let invocation = EngineInvocation {
            entrypoint: self.config.entrypoint.clone(),
            manifest_path: absolute(&request.manifest_path)?,
            output_dir: absolute(&request.output_dir)?,
            config_path: absolute(&request.engine_config_path)?,
            extra_args: self.config.extra_args.clone(),
            working_dir: self.config.working_dir.clone(),
        };

        info!(
            iteration = %request.iteration,
            documents = manifest.len(),
            "running extraction engine"
        );

        let output = self.invoke_with_retry(&invocation).await?;
        debug!(stdout_bytes = output.stdout.len(), "engine completed");

        let mut result = parse_artifacts(
            &invocation.output_dir,
            &self.config.artifacts,
            request.iteration,
            manifest,
        )?;
        result.timestamp = unix_now();

        info!(
            iteration = %request.iteration,
            terms = result.term_count(),
            documents = result.document_count(),
            "parsed extraction result"
        );
        Ok(result)
    }

    async fn invoke_with_retry(
        &self,
        invocation: &EngineInvocation,
    ) -> Result<EngineOutput, ExtractionError> {
        let policy = self.config.retry;
        let mut attempt: u32 = 0;
        loop {
            reset_dir(&invocation.output_dir).await?;
            match self.invoke_once(invocation).await {
                Ok(output) => {
                    if attempt > 0 {
                        info!(attempts = attempt + 1, "engine succeeded after retries");
                    }
                    return Ok(output);
                }
                Err(e) if e.is_engine_failure() && attempt < policy.max_retries => {
                    attempt += 1;
                    let backoff = policy.backoff(attempt);
                    warn!(
                        attempt,
                        max_retries = policy.max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "engine failed, retrying"
                    );
                    sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn invoke_once(&self, invocation: &EngineInvocation) -> Result<EngineOutput, ExtractionError> {
        match self.config.timeout() {
            Some(limit) => timeout(limit, self.runner.run(invocation))
                .await
                .map_err(|_| {
                    ExtractionError::engine(format!("engine timed out after {}s", limit.as_secs()))
                })?,
            None => self.runner.run(invocation).await,
        }
    }
}
