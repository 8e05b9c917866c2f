//! Test: Fail Fast - the first failing step ends the run

use crate::helpers::*;
use analytics_pipeline::core::RunError;

/// Step 2 of 3 exits 1: step 1 succeeds, step 2 fails, step 3 never runs
#[tokio::test]
async fn test_second_step_failure_stops_pipeline() {
    let pipeline = pipeline_from_yaml(&numbered_pipeline_yaml(3), ".");
    let executor = ScriptedExecutor::new().exit_with("step2", 1);

    let result = run_pipeline_with(&pipeline, executor.clone()).await;

    assert_pipeline_failed_at(&result, 2);
    assert_eq!(executor.invoked_steps(), vec!["step1", "step2"]);
    assert_eq!(result.succeeded_steps(), vec!["step1"]);
    assert_eq!(result.failed_steps(), vec!["step2"]);
    assert_eq!(result.exit_code(), 1);

    match &result.result {
        Err(RunError::StepFailed { index, step, exit_code }) => {
            assert_eq!(*index, 2);
            assert_eq!(step, "step2");
            assert_eq!(*exit_code, Some(1));
        }
        other => panic!("expected StepFailed, got {:?}", other),
    }
}

/// For every position, a failure there means no later step is invoked
#[tokio::test]
async fn test_no_step_after_failure_is_invoked() {
    let total = 5;
    for failing in 1..=total {
        let pipeline = pipeline_from_yaml(&numbered_pipeline_yaml(total), ".");
        let executor = ScriptedExecutor::new().exit_with(&format!("step{}", failing), 2);

        let result = run_pipeline_with(&pipeline, executor.clone()).await;

        assert_pipeline_failed_at(&result, failing);
        let expected: Vec<String> = (1..=failing).map(|i| format!("step{}", i)).collect();
        assert_eq!(executor.invoked_steps(), expected, "failing at {}", failing);
        assert_eq!(result.report.steps.len(), failing);
    }
}

/// The failing command's exit code becomes the process exit code
#[tokio::test]
async fn test_exit_code_is_propagated() {
    let pipeline = pipeline_from_yaml(&numbered_pipeline_yaml(2), ".");
    let executor = ScriptedExecutor::new().exit_with("step1", 42);

    let result = run_pipeline_with(&pipeline, executor).await;

    assert_pipeline_failed_at(&result, 1);
    assert_eq!(result.exit_code(), 42);
    let failed = result.report.failed_step().expect("failed step is recorded");
    assert_eq!(failed.name, "step1");
    assert_eq!(failed.outcome.exit_code, Some(42));
}

/// A step killed by a signal still fails the run with a non-zero code
#[tokio::test]
async fn test_signal_termination_fails_run() {
    let pipeline = pipeline_from_yaml(&numbered_pipeline_yaml(2), ".");
    let executor = ScriptedExecutor::new().killed("step2");

    let result = run_pipeline_with(&pipeline, executor).await;

    assert_pipeline_failed_at(&result, 2);
    assert_eq!(result.exit_code(), 1);
}

/// A step that cannot be started is recorded as the failed step
#[tokio::test]
async fn test_spawn_failure_is_recorded() {
    let pipeline = pipeline_from_yaml(&numbered_pipeline_yaml(3), ".");
    let executor = ScriptedExecutor::new().fail_to_spawn("step2");

    let result = run_pipeline_with(&pipeline, executor.clone()).await;

    assert_pipeline_failed_at(&result, 2);
    assert!(matches!(result.result, Err(RunError::Spawn { ref step, .. }) if step == "step2"));
    assert_eq!(result.exit_code(), 1);
    assert_eq!(executor.invoked_steps(), vec!["step1", "step2"]);
    assert_eq!(result.failed_steps(), vec!["step2"]);

    assert_eq!(result.report.steps.len(), 2);
    let failed = result.report.failed_step().expect("failed step is recorded");
    assert_eq!(failed.index, 2);
    assert_eq!(failed.name, "step2");
    assert!(!failed.outcome.succeeded);
    assert_eq!(failed.outcome.exit_code, None);
}
