//! Test utility functions for analytics-pipeline

use analytics_pipeline::core::config::PipelineConfig;
use analytics_pipeline::core::{Pipeline, RunError, RunReport, RunState, Step, StepOutcome};
use analytics_pipeline::execution::{CommandExecutor, ExecutionEngine, ExecutionEvent};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Executor that returns predefined exit codes instead of spawning processes
///
/// Steps without a scripted code exit 0.
#[derive(Clone, Default)]
pub struct ScriptedExecutor {
    exit_codes: HashMap<String, Option<i32>>,
    unavailable: HashSet<String>,
    unstartable: HashSet<String>,
    invoked: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the step named `step` exit with `code`
    pub fn exit_with(mut self, step: &str, code: i32) -> Self {
        self.exit_codes.insert(step.to_string(), Some(code));
        self
    }

    /// Make the step named `step` look killed by a signal
    pub fn killed(mut self, step: &str) -> Self {
        self.exit_codes.insert(step.to_string(), None);
        self
    }

    /// Pretend `program` is not installed
    pub fn without_program(mut self, program: &str) -> Self {
        self.unavailable.insert(program.to_string());
        self
    }

    /// Make the step named `step` fail to start at all
    pub fn fail_to_spawn(mut self, step: &str) -> Self {
        self.unstartable.insert(step.to_string());
        self
    }

    /// Names of the steps that were invoked, in order
    pub fn invoked_steps(&self) -> Vec<String> {
        self.invoked.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Working directories the steps were invoked in, in order
    pub fn invoked_dirs(&self) -> Vec<PathBuf> {
        self.invoked.lock().unwrap().iter().map(|(_, dir)| dir.clone()).collect()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    fn is_available(&self, program: &str, _working_dir: &Path) -> bool {
        !self.unavailable.contains(program)
    }

    async fn run(&self, step: &Step, working_dir: &Path) -> Result<StepOutcome, RunError> {
        self.invoked
            .lock()
            .unwrap()
            .push((step.name.clone(), working_dir.to_path_buf()));
        if self.unstartable.contains(&step.name) {
            return Err(RunError::Spawn {
                step: step.name.clone(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        let code = self.exit_codes.get(&step.name).copied().unwrap_or(Some(0));
        Ok(StepOutcome::from_exit_code(code))
    }
}

/// Build a pipeline from YAML rooted at `root`
pub fn pipeline_from_yaml(yaml: &str, root: &str) -> Pipeline {
    PipelineConfig::from_yaml(yaml)
        .expect("pipeline YAML should parse")
        .to_pipeline(root, &HashMap::new())
        .expect("pipeline should build")
}

/// Run a pipeline with an executor, capturing everything the engine emits
pub async fn run_pipeline_with<E: CommandExecutor>(
    pipeline: &Pipeline,
    executor: E,
) -> PipelineTestResult {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut engine = ExecutionEngine::new(executor);
    let sink = events.clone();
    engine.add_event_handler(move |event| sink.lock().unwrap().push(event));

    let mut report = RunReport::for_pipeline(pipeline);
    let result = engine.execute(pipeline, &mut report).await;

    let events = events.lock().unwrap().clone();
    PipelineTestResult {
        report,
        result,
        events,
    }
}

/// Test result from running a pipeline
pub struct PipelineTestResult {
    pub report: RunReport,
    pub result: Result<(), RunError>,
    pub events: Vec<ExecutionEvent>,
}

impl PipelineTestResult {
    /// Process exit code the CLI would use
    pub fn exit_code(&self) -> i32 {
        match &self.result {
            Ok(()) => 0,
            Err(e) => e.exit_code(),
        }
    }

    /// Names from `StepSucceeded` events, in order
    pub fn succeeded_steps(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StepSucceeded { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Names from `StepFailed` events, in order
    pub fn failed_steps(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExecutionEvent::StepFailed { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of per-step events (started, succeeded, failed)
    pub fn step_event_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ExecutionEvent::StepStarted { .. }
                        | ExecutionEvent::StepSucceeded { .. }
                        | ExecutionEvent::StepFailed { .. }
                )
            })
            .count()
    }
}

/// Assert the run finished successfully
pub fn assert_pipeline_succeeded(result: &PipelineTestResult) {
    assert!(
        result.result.is_ok(),
        "Pipeline should succeed, got {:?}",
        result.result
    );
    assert_eq!(result.report.state, RunState::Succeeded);
    assert_eq!(result.exit_code(), 0);
}

/// Assert the run failed at step `index`
pub fn assert_pipeline_failed_at(result: &PipelineTestResult, index: usize) {
    assert!(result.result.is_err(), "Pipeline should fail");
    assert_eq!(result.report.state, RunState::Failed(index));
    assert_ne!(result.exit_code(), 0);
}

/// Shorthand for a YAML pipeline of `n` steps named `step1..stepN`
pub fn numbered_pipeline_yaml(n: usize) -> String {
    let mut yaml = String::from("name: \"Numbered\"\nsteps:\n");
    for i in 1..=n {
        yaml.push_str(&format!(
            "  - name: \"step{i}\"\n    command: [\"tool\", \"{i}\"]\n"
        ));
    }
    yaml
}
