//! CLI command definitions

use crate::core::presets::PipelinePreset;
use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;

/// Run a pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Built-in pipeline to run
    #[arg(long, value_enum, default_value_t = PresetArg::Analytics, conflicts_with = "file")]
    pub preset: PresetArg,

    /// Path to a pipeline YAML file instead of a built-in pipeline
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Variable overrides (key=value)
    #[arg(long, value_parser = parse_key_value)]
    pub variable: Vec<(String, String)>,

    /// Print the run report as JSON when finished
    #[arg(long)]
    pub json: bool,
}

impl Default for RunCommand {
    fn default() -> Self {
        Self {
            preset: PresetArg::Analytics,
            file: None,
            variable: Vec::new(),
            json: false,
        }
    }
}

impl RunCommand {
    /// Variable overrides as a map; later values win
    pub fn overrides(&self) -> HashMap<String, String> {
        self.variable.iter().cloned().collect()
    }
}

/// Verify the project layout or a pipeline's artifacts
#[derive(Debug, Args, Clone)]
pub struct VerifyCommand {
    /// Path to a manifest YAML file instead of the built-in project layout
    #[arg(short, long, conflicts_with = "artifacts")]
    pub manifest: Option<PathBuf>,

    /// Check the artifacts a pipeline is expected to produce
    #[arg(long)]
    pub artifacts: bool,

    /// Built-in pipeline whose artifacts are checked (with --artifacts)
    #[arg(long, value_enum, default_value_t = PresetArg::Analytics, requires = "artifacts", conflicts_with = "file")]
    pub preset: PresetArg,

    /// Pipeline YAML file whose artifacts are checked (with --artifacts)
    #[arg(short, long, requires = "artifacts")]
    pub file: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a pipeline or manifest file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to the YAML file
    #[arg(short, long)]
    pub file: PathBuf,

    /// Treat the file as a manifest rather than a pipeline
    #[arg(long)]
    pub manifest: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List built-in pipelines and manifests
#[derive(Debug, Args, Clone)]
pub struct ListCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Built-in pipeline argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    Analytics,
    Publish,
}

impl From<PresetArg> for PipelinePreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Analytics => PipelinePreset::Analytics,
            PresetArg::Publish => PipelinePreset::Publish,
        }
    }
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid key=value pair: {}", s)),
    }
}
