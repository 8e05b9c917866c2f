//! CLI output formatting

use crate::{
    core::{RunReport, RunState},
    execution::ExecutionEvent,
    verification::{PathCheck, VerificationReport},
};
use console::Emoji;
use std::time::Duration;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a run state for display
pub fn format_state(state: RunState) -> String {
    match state {
        RunState::Pending => style("PENDING").dim().to_string(),
        RunState::Running(index) => style(format!("RUNNING (step {})", index)).yellow().to_string(),
        RunState::Succeeded => style("SUCCEEDED").green().to_string(),
        RunState::Failed(index) => style(format!("FAILED (step {})", index)).red().to_string(),
    }
}

/// `[N/M]` progress prefix
pub fn format_progress(index: usize, total: usize) -> String {
    format!("[{}/{}]", index, total)
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            run_id,
            pipeline_name,
            total_steps,
        } => format!(
            "{} Starting pipeline {} ({} steps, {})",
            ROCKET,
            style(pipeline_name).bold(),
            style(total_steps).cyan(),
            style(&run_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted {
            index,
            total,
            name,
            command,
        } => format!(
            "{} {} {} {}",
            SPINNER,
            style(format_progress(*index, *total)).dim(),
            style(name).cyan(),
            style(format!("$ {}", command)).dim()
        ),
        ExecutionEvent::StepSucceeded {
            index,
            total,
            name,
            duration,
        } => format!(
            "{} {} {} {}",
            CHECK,
            style(format_progress(*index, *total)).dim(),
            style(name).green(),
            style(format!("({})", format_duration(*duration))).dim()
        ),
        ExecutionEvent::StepFailed {
            index,
            total,
            name,
            error,
        } => format!(
            "{} {} {}: {}",
            CROSS,
            style(format_progress(*index, *total)).dim(),
            style(name).red(),
            style(error).dim()
        ),
        ExecutionEvent::PipelineFinished { run_id, state } => format!(
            "{} Pipeline ({}) {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_state(*state)
        ),
    }
}

/// Final summary lines for a run
pub fn format_run_summary(report: &RunReport) -> String {
    let mut lines = Vec::new();

    if report.succeeded() {
        lines.push(format!(
            "{} {} completed {} ({}/{} steps)",
            CHECK,
            style(&report.pipeline_name).bold(),
            style("successfully").green(),
            report.completed_steps(),
            report.total_steps
        ));
        if !report.artifacts.is_empty() {
            lines.push(format!("{} Expected outputs:", INFO));
            for artifact in &report.artifacts {
                lines.push(format!("  - {}", style(artifact).cyan()));
            }
        }
    } else {
        lines.push(format!(
            "{} {} {} ({}/{} steps completed)",
            CROSS,
            style(&report.pipeline_name).bold(),
            style("failed").red(),
            report.completed_steps(),
            report.total_steps
        ));
    }

    if let (Some(finished), true) = (report.finished_at, report.state.is_terminal()) {
        if let Ok(elapsed) = finished.signed_duration_since(report.started_at).to_std() {
            lines.push(format!("  Duration: {}", style(format_duration(elapsed)).dim()));
        }
    }

    lines.join("\n")
}

/// Format one verification check
pub fn format_path_check(check: &PathCheck) -> String {
    let kind = match check.expected.kind {
        crate::core::PathKind::File => "",
        crate::core::PathKind::Dir => "/",
    };
    if check.found {
        format!("{} {}{}", CHECK, check.expected.display_name(), kind)
    } else {
        format!(
            "{} {}{} {}",
            CROSS,
            style(check.expected.display_name()).red(),
            kind,
            style("(missing)").dim()
        )
    }
}

/// Tally line for a verification report
pub fn format_verification_summary(report: &VerificationReport) -> String {
    if report.is_complete() {
        format!(
            "{} {}: all {} expected paths present",
            CHECK,
            style(&report.manifest).bold(),
            style(report.total()).green()
        )
    } else {
        format!(
            "{} {}: {} found, {} missing - verification incomplete",
            WARN,
            style(&report.manifest).bold(),
            style(report.found()).green(),
            style(report.missing()).red()
        )
    }
}

/// Horizontal rule sized to the terminal
pub fn separator() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(80);
    "─".repeat(width.min(120))
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
