//! Error types for pipeline runs

use thiserror::Error;

/// Exit code used when a required tool cannot be found (shell convention)
pub const EXIT_TOOL_NOT_FOUND: i32 = 127;

/// Exit code used for every other failure that has no code of its own
pub const EXIT_FAILURE: i32 = 1;

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum RunError {
    /// A step's command exited with a non-zero status
    #[error("step {index} '{step}' failed ({})", describe_exit(.exit_code))]
    StepFailed {
        index: usize,
        step: String,
        exit_code: Option<i32>,
    },

    /// A program the pipeline needs is not installed
    #[error("required tool '{program}' was not found on PATH")]
    ToolNotFound { program: String },

    /// The command could not be started for a reason other than a missing binary
    #[error("failed to start step '{step}': {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// The run state machine was driven out of order
    #[error("invalid run state transition: {0}")]
    InvalidTransition(String),
}

impl RunError {
    /// Process exit code that reports this error to the caller
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::StepFailed { exit_code, .. } => match exit_code {
                Some(code) if *code != 0 => *code,
                _ => EXIT_FAILURE,
            },
            RunError::ToolNotFound { .. } => EXIT_TOOL_NOT_FOUND,
            RunError::Spawn { .. } | RunError::InvalidTransition(_) => EXIT_FAILURE,
        }
    }

    /// Name of the step this error belongs to, if any
    pub fn step_name(&self) -> Option<&str> {
        match self {
            RunError::StepFailed { step, .. } | RunError::Spawn { step, .. } => Some(step),
            _ => None,
        }
    }
}

/// Human-readable description of an exit status
pub fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
