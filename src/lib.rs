//! analytics-pipeline - runs the e-commerce analytics scripts in order,
//! publishes the project, and verifies its layout

pub mod cli;
pub mod core;
pub mod execution;
pub mod verification;

// Re-export commonly used types
pub use crate::core::{Manifest, Pipeline, RunError, RunReport, RunState, Step, StepOutcome};
pub use crate::execution::{CommandExecutor, ExecutionEngine, ExecutionEvent, ProcessExecutor};
pub use crate::verification::{verify_manifest, VerificationReport};
