//! Engine runners - the seam between the adapter and the external engine

use crate::error::ExtractionError;
use serde_json::{json, Value};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Arguments of one engine invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInvocation {
    /// Engine executable
    pub entrypoint: PathBuf,
    /// Manifest file (absolute)
    pub manifest_path: PathBuf,
    /// Isolated output directory (absolute)
    pub output_dir: PathBuf,
    /// Engine configuration document (absolute)
    pub config_path: PathBuf,
    /// Arguments appended after the positional ones
    pub extra_args: Vec<String>,
    /// Directory to run the engine in
    pub working_dir: Option<PathBuf>,
}

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

/// Runs the extraction engine
///
/// A runner only executes the engine; writing the manifest, preparing the
/// output directory and parsing artifacts belong to the [`Extractor`](crate::Extractor).
pub trait EngineRunner: Send + Sync {
    /// Run the engine to completion
    ///
    /// # Errors
    ///
    /// [`ExtractionError::Engine`] when the engine cannot be started or exits
    /// non-zero.
    fn run(
        &self,
        invocation: &EngineInvocation,
    ) -> impl Future<Output = Result<EngineOutput, ExtractionError>> + Send;
}

/// Runs the engine as a subprocess
///
/// The child is killed if the invocation future is dropped, so an expired
/// timeout never leaves an orphaned engine behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a subprocess runner
    pub fn new() -> Self {
        Self
    }
}

impl EngineRunner for CommandRunner {
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineOutput, ExtractionError> {
        // A relative entrypoint such as `./saffron.sh` names a file in the working dir
        let program = match &invocation.working_dir {
            Some(dir) if invocation.entrypoint.is_relative() && invocation.entrypoint.components().count() > 1 => {
                dir.join(&invocation.entrypoint)
            }
            _ => invocation.entrypoint.clone(),
        };
        let mut command = Command::new(&program);
        command
            .arg(&invocation.manifest_path)
            .arg(&invocation.output_dir)
            .arg(&invocation.config_path)
            .args(&invocation.extra_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        debug!(
            entrypoint = %invocation.entrypoint.display(),
            manifest = %invocation.manifest_path.display(),
            output = %invocation.output_dir.display(),
            "spawning extraction engine"
        );

        let output = command.output().await.map_err(|e| {
            ExtractionError::engine(format!(
                "failed to start {}: {}",
                invocation.entrypoint.display(),
                e
            ))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ExtractionError::Engine {
                reason: format!("engine exited with {}", output.status),
                stderr,
            });
        }
        Ok(EngineOutput { stdout, stderr })
    }
}

/// Artifacts a [`MockRunner`] writes for one invocation
///
/// Each artifact is raw file content; `None` leaves the file absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockOutput {
    /// `terms.json`
    pub terms: Option<String>,
    /// `doc-terms.json`
    pub doc_terms: Option<String>,
    /// `author-terms.json`
    pub author_terms: Option<String>,
    /// `term-sim.json`
    pub term_similarity: Option<String>,
}

impl MockOutput {
    /// Output with a term list in the engine's array format
    pub fn with_terms(terms: &[(&str, f64)]) -> Self {
        let terms: Vec<Value> = terms
            .iter()
            .map(|(term, score)| json!({"term_string": term, "score": score, "occurrences": 1, "matches": 1}))
            .collect();
        Self {
            terms: Some(Value::Array(terms).to_string()),
            ..Self::default()
        }
    }

    /// Add document-term associations: `(document_id, term, occurrences)`
    pub fn doc_terms(mut self, associations: &[(&str, &str, u64)]) -> Self {
        let entries: Vec<Value> = associations
            .iter()
            .map(|(doc, term, occurrences)| {
                json!({"document_id": doc, "term_string": term, "occurrences": occurrences, "tfidf": 0.0})
            })
            .collect();
        self.doc_terms = Some(Value::Array(entries).to_string());
        self
    }

    /// Add a similarity matrix as `(term1, term2, similarity)` triples
    pub fn similarity(mut self, triples: &[(&str, &str, f64)]) -> Self {
        let entries: Vec<Value> = triples
            .iter()
            .map(|(t1, t2, sim)| json!({"term1": t1, "term2": t2, "similarity": sim}))
            .collect();
        self.term_similarity = Some(Value::Array(entries).to_string());
        self
    }

    /// Replace the raw content of the terms artifact
    pub fn raw_terms(mut self, content: impl Into<String>) -> Self {
        self.terms = Some(content.into());
        self
    }

    /// Replace the raw content of the author-terms artifact
    pub fn raw_author_terms(mut self, content: impl Into<String>) -> Self {
        self.author_terms = Some(content.into());
        self
    }

    /// Replace the raw content of the similarity artifact
    pub fn raw_similarity(mut self, content: impl Into<String>) -> Self {
        self.term_similarity = Some(content.into());
        self
    }
}

type CallHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct MockState {
    outputs: Vec<(usize, MockOutput)>,
    failures: Vec<(usize, String)>,
    hooks: Vec<(usize, CallHook)>,
    invocations: Vec<EngineInvocation>,
}

impl fmt::Debug for MockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockState")
            .field("outputs", &self.outputs)
            .field("failures", &self.failures)
            .field("hooks", &self.hooks.len())
            .field("invocations", &self.invocations)
            .finish()
    }
}

/// Deterministic fake engine for testing
///
/// Writes a scripted [`MockOutput`] into the invocation's output directory,
/// or fails on chosen invocations. Clones share state, so a test can keep a
/// handle while the extractor owns the runner.
///
/// # Examples
///
/// ```
/// use plateau_extractor::{MockOutput, MockRunner};
///
/// let runner = MockRunner::new(MockOutput::with_terms(&[("virtue", 0.8)]))
///     .fail_on(2, "OutOfMemoryError");
/// assert_eq!(runner.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockRunner {
    default_output: MockOutput,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockRunner {
    /// Create a runner that writes the same output on every call
    pub fn new(default_output: MockOutput) -> Self {
        Self {
            default_output,
            delay: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Use a specific output for the `call`-th invocation (1-based)
    pub fn with_output(self, call: usize, output: MockOutput) -> Self {
        self.lock().outputs.push((call, output));
        self
    }

    /// Exit non-zero with `stderr` on the `call`-th invocation (1-based)
    pub fn fail_on(self, call: usize, stderr: impl Into<String>) -> Self {
        self.lock().failures.push((call, stderr.into()));
        self
    }

    /// Run `hook` when the `call`-th invocation (1-based) finishes
    pub fn after_call(self, call: usize, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.lock().hooks.push((call, Arc::new(hook)));
        self
    }

    /// Sleep before every invocation completes
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of invocations so far
    pub fn call_count(&self) -> usize {
        self.lock().invocations.len()
    }

    /// Every invocation received, in order
    pub fn invocations(&self) -> Vec<EngineInvocation> {
        self.lock().invocations.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn script(&self, invocation: &EngineInvocation) -> (usize, Result<MockOutput, String>) {
        let mut state = self.lock();
        state.invocations.push(invocation.clone());
        let call = state.invocations.len();
        (call, Self::scripted_output(&state, call, &self.default_output))
    }

    fn scripted_output(
        state: &MockState,
        call: usize,
        default_output: &MockOutput,
    ) -> Result<MockOutput, String> {
        if let Some((_, stderr)) = state.failures.iter().find(|(n, _)| *n == call) {
            return Err(stderr.clone());
        }
        Ok(state
            .outputs
            .iter()
            .rev()
            .find(|(n, _)| *n == call)
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| default_output.clone()))
    }

    fn finish_call(&self, call: usize) {
        let hooks: Vec<CallHook> = self
            .lock()
            .hooks
            .iter()
            .filter(|(n, _)| *n == call)
            .map(|(_, hook)| Arc::clone(hook))
            .collect();
        for hook in hooks {
            hook();
        }
    }
}

async fn write_artifact(dir: &Path, name: &str, content: &Option<String>) -> Result<(), ExtractionError> {
    if let Some(content) = content {
        tokio::fs::write(dir.join(name), content).await?;
    }
    Ok(())
}

impl EngineRunner for MockRunner {
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineOutput, ExtractionError> {
        let (call, scripted) = self.script(invocation);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let output = match scripted {
            Ok(output) => output,
            Err(stderr) => {
                self.finish_call(call);
                return Err(ExtractionError::Engine {
                    reason: "engine exited with exit status: 1".to_string(),
                    stderr,
                });
            }
        };

        let dir = &invocation.output_dir;
        tokio::fs::create_dir_all(dir).await?;
        write_artifact(dir, "terms.json", &output.terms).await?;
        write_artifact(dir, "doc-terms.json", &output.doc_terms).await?;
        write_artifact(dir, "author-terms.json", &output.author_terms).await?;
        write_artifact(dir, "term-sim.json", &output.term_similarity).await?;
        self.finish_call(call);

        Ok(EngineOutput {
            stdout: "mock engine completed".to_string(),
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn invocation(dir: &Path) -> EngineInvocation {
        EngineInvocation {
            entrypoint: PathBuf::from("./saffron.sh"),
            manifest_path: dir.join("corpus.json"),
            output_dir: dir.join("out"),
            config_path: dir.join("config.json"),
            extra_args: Vec::new(),
            working_dir: None,
        }
    }

    #[tokio::test]
    async fn test_mock_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new(MockOutput::with_terms(&[("virtue", 0.8)]));
        runner.run(&invocation(dir.path())).await.unwrap();

        let terms = std::fs::read_to_string(dir.path().join("out/terms.json")).unwrap();
        assert!(terms.contains("virtue"));
        assert!(!dir.path().join("out/doc-terms.json").exists());
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fails_on_chosen_call() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new(MockOutput::default()).fail_on(2, "boom");
        let handle = runner.clone();

        assert!(runner.run(&invocation(dir.path())).await.is_ok());
        let err = runner.run(&invocation(dir.path())).await.unwrap_err();
        assert_eq!(err.stderr(), Some("boom"));
        assert!(runner.run(&invocation(dir.path())).await.is_ok());
        assert_eq!(handle.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_per_call_output() {
        let dir = TempDir::new().unwrap();
        let runner = MockRunner::new(MockOutput::with_terms(&[("a", 1.0)]))
            .with_output(2, MockOutput::with_terms(&[("b", 1.0)]));

        runner.run(&invocation(dir.path())).await.unwrap();
        runner.run(&invocation(dir.path())).await.unwrap();
        let terms = std::fs::read_to_string(dir.path().join("out/terms.json")).unwrap();
        assert!(terms.contains("\"b\""));
    }

    #[tokio::test]
    async fn test_mock_runs_hook_after_chosen_call() {
        let dir = TempDir::new().unwrap();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&fired);
        let runner = MockRunner::new(MockOutput::default())
            .after_call(2, move || log.lock().unwrap().push(2));

        runner.run(&invocation(dir.path())).await.unwrap();
        assert!(fired.lock().unwrap().is_empty());
        runner.run(&invocation(dir.path())).await.unwrap();
        assert_eq!(*fired.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_command_runner_reports_spawn_failure() {
        let dir = TempDir::new().unwrap();
        let mut inv = invocation(dir.path());
        inv.entrypoint = dir.path().join("no-such-engine");
        let err = CommandRunner::new().run(&inv).await.unwrap_err();
        assert!(err.is_engine_failure());
        assert!(err.to_string().contains("failed to start"));
    }
}
