//! Main execution engine - runs a pipeline's steps in order, stopping at the
//! first failure

use crate::{
    core::{Pipeline, RunError, RunReport, RunState, StepOutcome, StepRecord},
    execution::CommandExecutor,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        run_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        total: usize,
        name: String,
        command: String,
    },
    StepSucceeded {
        index: usize,
        total: usize,
        name: String,
        duration: Duration,
    },
    StepFailed {
        index: usize,
        total: usize,
        name: String,
        error: String,
    },
    PipelineFinished {
        run_id: Uuid,
        state: RunState,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Main pipeline execution engine
pub struct ExecutionEngine<E> {
    executor: E,
    event_handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor> ExecutionEngine<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Execute the entire pipeline, recording progress in `report`
    ///
    /// Steps run one at a time. The first step that exits non-zero (or
    /// cannot be started) ends the run; later steps are never invoked.
    pub async fn execute(&self, pipeline: &Pipeline, report: &mut RunReport) -> Result<(), RunError> {
        let total = pipeline.steps.len();

        info!("Starting pipeline execution: {} ({})", pipeline.name, report.run_id);
        self.emit_event(ExecutionEvent::PipelineStarted {
            run_id: report.run_id,
            pipeline_name: pipeline.name.clone(),
            total_steps: total,
        });

        for (program, working_dir) in pipeline.required_programs() {
            if !self.executor.is_available(&program, &working_dir) {
                error!("Required tool '{}' is not available", program);
                report.finish();
                self.emit_event(ExecutionEvent::PipelineFinished {
                    run_id: report.run_id,
                    state: report.state,
                });
                return Err(RunError::ToolNotFound { program });
            }
        }

        report.state.start(total)?;

        for step in &pipeline.steps {
            self.emit_event(ExecutionEvent::StepStarted {
                index: step.index,
                total,
                name: step.name.clone(),
                command: step.display_command(),
            });

            let started = Instant::now();
            let working_dir = step.resolve_working_dir(&pipeline.root);
            let outcome = match self.executor.run(step, &working_dir).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Step {} could not run: {}", step.name, e);
                    report.steps.push(StepRecord {
                        index: step.index,
                        name: step.name.clone(),
                        outcome: StepOutcome::from_exit_code(None),
                        duration: started.elapsed(),
                    });
                    return self.abort(report, step.index, &step.name, e);
                }
            };

            report.steps.push(StepRecord {
                index: step.index,
                name: step.name.clone(),
                outcome,
                duration: started.elapsed(),
            });

            if !outcome.succeeded {
                let err = RunError::StepFailed {
                    index: step.index,
                    step: step.name.clone(),
                    exit_code: outcome.exit_code,
                };
                error!("{}", err);
                return self.abort(report, step.index, &step.name, err);
            }

            info!("Step {} completed successfully", step.name);
            self.emit_event(ExecutionEvent::StepSucceeded {
                index: step.index,
                total,
                name: step.name.clone(),
                duration: started.elapsed(),
            });
            report.state.advance(total)?;
        }

        report.finish();
        info!("Pipeline execution finished: {} - {:?}", pipeline.name, report.state);
        self.emit_event(ExecutionEvent::PipelineFinished {
            run_id: report.run_id,
            state: report.state,
        });

        Ok(())
    }

    /// Move the run to `Failed`, announce it, and hand back the error
    fn abort(
        &self,
        report: &mut RunReport,
        index: usize,
        name: &str,
        err: RunError,
    ) -> Result<(), RunError> {
        report.state.fail()?;
        report.finish();

        self.emit_event(ExecutionEvent::StepFailed {
            index,
            total: report.total_steps,
            name: name.to_string(),
            error: err.to_string(),
        });
        self.emit_event(ExecutionEvent::PipelineFinished {
            run_id: report.run_id,
            state: report.state,
        });

        Err(err)
    }
}
