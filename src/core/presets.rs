//! Built-in pipeline and manifest definitions embedded in the binary

use crate::core::{config::PipelineConfig, manifest::Manifest};
use anyhow::Result;

/// Built-in pipeline definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePreset {
    /// Run the seven analysis scripts in order
    Analytics,
    /// Initialize a git repository and push it to a remote
    Publish,
}

impl PipelinePreset {
    pub const ALL: [PipelinePreset; 2] = [PipelinePreset::Analytics, PipelinePreset::Publish];

    pub fn key(&self) -> &'static str {
        match self {
            PipelinePreset::Analytics => "analytics",
            PipelinePreset::Publish => "publish",
        }
    }

    fn yaml(&self) -> &'static str {
        match self {
            PipelinePreset::Analytics => include_str!("../../pipelines/analytics.yaml"),
            PipelinePreset::Publish => include_str!("../../pipelines/publish.yaml"),
        }
    }

    /// Parse the embedded definition
    pub fn config(&self) -> Result<PipelineConfig> {
        PipelineConfig::from_yaml(self.yaml())
    }
}

impl Default for PipelinePreset {
    fn default() -> Self {
        PipelinePreset::Analytics
    }
}

/// The expected layout of the analytics project
pub fn project_manifest() -> Result<Manifest> {
    Manifest::from_yaml(include_str!("../../pipelines/project.yaml"))
}
