//! Scenario-based tests for analytics-pipeline

mod fail_fast;
mod verification;
