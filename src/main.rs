use analytics_pipeline::cli::commands::{ListCommand, RunCommand, ValidateCommand, VerifyCommand};
use analytics_pipeline::cli::output::*;
use analytics_pipeline::cli::{Cli, Command};
use analytics_pipeline::core::config::PipelineConfig;
use analytics_pipeline::core::error::EXIT_FAILURE;
use analytics_pipeline::core::presets::{self, PipelinePreset};
use analytics_pipeline::core::{Manifest, RunReport};
use analytics_pipeline::execution::{ExecutionEngine, ProcessExecutor};
use analytics_pipeline::verification::verify_manifest;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match cli.command_or_default() {
        Command::Run(cmd) => run_pipeline(&cmd, &cli.root).await?,
        Command::Verify(cmd) => verify_project(&cmd, &cli.root)?,
        Command::Validate(cmd) => validate_file(&cmd)?,
        Command::List(cmd) => list_presets(&cmd)?,
    }

    Ok(())
}

/// Load a pipeline definition from a file or a built-in preset
fn load_config(file: Option<&PathBuf>, preset: PipelinePreset) -> Result<PipelineConfig> {
    match file {
        Some(path) => PipelineConfig::from_file(path).context("Failed to load pipeline config"),
        None => preset.config().context("Failed to load built-in pipeline"),
    }
}

async fn run_pipeline(cmd: &RunCommand, root: &Path) -> Result<()> {
    let config = load_config(cmd.file.as_ref(), cmd.preset.into())?;

    println!("{} Loaded pipeline: {}", INFO, style(&config.name).bold());

    for (key, value) in &cmd.variable {
        println!(
            "{} Variable override: {} = {}",
            INFO,
            style(key).cyan(),
            style(value).dim()
        );
    }

    let pipeline = match config.to_pipeline(root, &cmd.overrides()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            println!("{} {}", CROSS, style(format!("{:#}", e)).red());
            std::process::exit(EXIT_FAILURE);
        }
    };

    let mut engine = ExecutionEngine::new(ProcessExecutor::new());
    engine.add_event_handler(|event| {
        println!("{}", format_execution_event(&event));
    });

    println!();
    let mut report = RunReport::for_pipeline(&pipeline);
    let result = engine.execute(&pipeline, &mut report).await;

    println!("{}", separator());
    println!("{}", format_run_summary(&report));

    if cmd.json {
        println!("\n{}", serde_json::to_string_pretty(&report)?);
    }

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn verify_project(cmd: &VerifyCommand, root: &Path) -> Result<()> {
    let manifest = if cmd.artifacts {
        let config = load_config(cmd.file.as_ref(), cmd.preset.into())?;
        Manifest::from_artifacts(&format!("{} artifacts", config.name), &config.artifacts)
    } else {
        match &cmd.manifest {
            Some(path) => Manifest::from_file(path).context("Failed to load manifest")?,
            None => presets::project_manifest().context("Failed to load built-in manifest")?,
        }
    };

    println!(
        "{} Verifying {} in {}",
        INFO,
        style(&manifest.name).bold(),
        style(root.display()).dim()
    );

    let report = verify_manifest(root, &manifest);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            println!("  {}", format_path_check(check));
        }
    }
    println!("\n{}", format_verification_summary(&report));

    if !report.is_complete() {
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

fn validate_file(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating {}...", INFO, style(cmd.file.display()).dim());

    let result = if cmd.manifest {
        Manifest::from_file(&cmd.file).and_then(|manifest| {
            println!("{} Manifest is valid!", CHECK);
            println!("  Name: {}", style(&manifest.name).bold());
            println!("  Paths: {}", style(manifest.paths.len()).cyan());
            if cmd.json {
                println!("\n{}", serde_json::to_string_pretty(&manifest)?);
            }
            Ok(())
        })
    } else {
        PipelineConfig::from_file(&cmd.file).and_then(|config| {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());
            println!("  Variables: {}", style(config.variables.len()).cyan());
            println!("  Artifacts: {}", style(config.artifacts.len()).cyan());
            if cmd.json {
                println!("\n{}", serde_json::to_string_pretty(&config)?);
            }
            Ok(())
        })
    };

    if let Err(e) = result {
        println!("{} Validation failed:", CROSS);
        println!("  {}", style(format!("{:#}", e)).red());
        std::process::exit(EXIT_FAILURE);
    }

    Ok(())
}

fn list_presets(cmd: &ListCommand) -> Result<()> {
    let manifest = presets::project_manifest()?;

    if cmd.json {
        let mut pipelines = Vec::new();
        for preset in PipelinePreset::ALL {
            pipelines.push(serde_json::json!({
                "key": preset.key(),
                "pipeline": preset.config()?,
            }));
        }
        let data = serde_json::json!({ "pipelines": pipelines, "manifest": manifest });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Built-in pipelines:", INFO);
    for preset in PipelinePreset::ALL {
        let config = preset.config()?;
        println!(
            "  {} - {}",
            style(preset.key()).cyan(),
            style(&config.name).bold()
        );
        if let Some(description) = &config.description {
            println!("    {}", style(description).dim());
        }
        // Show raw commands; unresolved placeholders stay visible
        let total = config.steps.len();
        for (i, step) in config.steps.iter().enumerate() {
            println!(
                "    {} {}: {}",
                style(format_progress(i + 1, total)).dim(),
                style(&step.name).bold(),
                step.command.join(" ")
            );
        }
        if !config.variables.is_empty() {
            let mut vars: Vec<_> = config.variables.iter().collect();
            vars.sort();
            for (key, value) in vars {
                println!("    {} = {}", style(key).cyan(), style(value).dim());
            }
        }
    }

    println!("\n{} Built-in manifest: {}", INFO, style(&manifest.name).bold());
    for entry in &manifest.paths {
        println!("  - {} ({:?})", entry.path, entry.kind);
    }

    Ok(())
}
