//! Execution state models

use crate::core::{error::RunError, Pipeline};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// State of a pipeline run
///
/// `Pending -> Running(i) -> Running(i + 1) -> ... -> Succeeded`, or
/// `Running(i) -> Failed(i)` on the first failing step. Step indices are
/// 1-based to match progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "step", rename_all = "snake_case")]
pub enum RunState {
    /// Run has not started
    Pending,
    /// Step `index` is executing
    Running(usize),
    /// Every step exited successfully
    Succeeded,
    /// Step `index` failed and the run stopped there
    Failed(usize),
}

impl RunState {
    /// Check if the run has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed(_))
    }

    /// Leave `Pending`: enter the first step, or finish straight away when
    /// there is nothing to run
    pub fn start(&mut self, total_steps: usize) -> Result<(), RunError> {
        match self {
            RunState::Pending => {
                *self = if total_steps == 0 {
                    RunState::Succeeded
                } else {
                    RunState::Running(1)
                };
                Ok(())
            }
            other => Err(RunError::InvalidTransition(format!(
                "cannot start a run in state {:?}",
                other
            ))),
        }
    }

    /// The current step succeeded: move to the next one or finish
    pub fn advance(&mut self, total_steps: usize) -> Result<(), RunError> {
        match *self {
            RunState::Running(index) if index < total_steps => {
                *self = RunState::Running(index + 1);
                Ok(())
            }
            RunState::Running(index) if index == total_steps => {
                *self = RunState::Succeeded;
                Ok(())
            }
            other => Err(RunError::InvalidTransition(format!(
                "cannot advance from {:?} with {} steps",
                other, total_steps
            ))),
        }
    }

    /// The current step failed
    pub fn fail(&mut self) -> Result<(), RunError> {
        match *self {
            RunState::Running(index) => {
                *self = RunState::Failed(index);
                Ok(())
            }
            other => Err(RunError::InvalidTransition(format!(
                "cannot fail from {:?}",
                other
            ))),
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        RunState::Pending
    }
}

/// Outcome of running one step's command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub succeeded: bool,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl StepOutcome {
    pub fn from_exit_code(exit_code: Option<i32>) -> Self {
        Self {
            succeeded: exit_code == Some(0),
            exit_code,
        }
    }

    pub fn success() -> Self {
        Self::from_exit_code(Some(0))
    }
}

/// Record of one executed step, kept for the final report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub name: String,
    pub outcome: StepOutcome,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

/// Summary of a whole pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique run ID
    pub run_id: uuid::Uuid,

    /// Pipeline name
    pub pipeline_name: String,

    /// Final state
    pub state: RunState,

    /// Total number of steps defined
    pub total_steps: usize,

    /// Steps that were executed, in order
    pub steps: Vec<StepRecord>,

    /// Files the pipeline is expected to have produced
    pub artifacts: Vec<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new(pipeline_name: &str, total_steps: usize, artifacts: Vec<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4(),
            pipeline_name: pipeline_name.to_string(),
            state: RunState::Pending,
            total_steps,
            steps: Vec::new(),
            artifacts,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Create an empty report for `pipeline`
    pub fn for_pipeline(pipeline: &Pipeline) -> Self {
        Self::new(&pipeline.name, pipeline.steps.len(), pipeline.artifacts.clone())
    }

    /// Mark the report as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> bool {
        self.state == RunState::Succeeded
    }

    /// Number of steps that exited successfully
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.succeeded).count()
    }

    /// The failing step, if the run failed
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| !s.outcome.succeeded)
    }

    /// Calculate progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 1.0;
        }
        self.completed_steps() as f64 / self.total_steps as f64
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
