//! Pipeline configuration from YAML

use crate::core::Pipeline;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Top-level pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Pipeline name
    pub name: String,

    /// Optional pipeline description
    #[serde(default)]
    pub description: Option<String>,

    /// Default values for `{{ name }}` placeholders in step commands
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Pipeline steps, in execution order
    #[serde(default)]
    pub steps: Vec<StepConfig>,

    /// Paths (relative to the project root) the pipeline is expected to produce
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Human-readable step name
    pub name: String,

    /// Program followed by its arguments
    pub command: Vec<String>,

    /// Directory to run in, relative to the project root
    #[serde(default)]
    pub working_dir: Option<String>,
}

impl PipelineConfig {
    /// Load pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the pipeline configuration
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Pipeline name must not be empty");
        }

        let mut seen_names = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                anyhow::bail!("Step {} has an empty name", i + 1);
            }
            if !seen_names.insert(&step.name) {
                anyhow::bail!("Duplicate step name: {}", step.name);
            }
            match step.command.first() {
                None => anyhow::bail!("Step '{}' has an empty command", step.name),
                Some(program) if program.trim().is_empty() => {
                    anyhow::bail!("Step '{}' has an empty program", step.name)
                }
                Some(_) => {}
            }
            if let Some(dir) = &step.working_dir {
                if Path::new(dir).is_absolute() {
                    anyhow::bail!(
                        "Step '{}' working_dir must be relative to the project root: {}",
                        step.name,
                        dir
                    );
                }
            }
        }

        for artifact in &self.artifacts {
            if Path::new(artifact).is_absolute() {
                anyhow::bail!("Artifact path must be relative: {}", artifact);
            }
        }

        Ok(())
    }

    /// Convert config to a Pipeline domain model rooted at `root`
    ///
    /// `overrides` take precedence over the defaults declared in the file.
    /// Fails if any placeholder is left without a value.
    pub fn to_pipeline(
        &self,
        root: impl AsRef<Path>,
        overrides: &HashMap<String, String>,
    ) -> Result<Pipeline> {
        let mut variables = self.variables.clone();
        variables.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Pipeline::from_config(self, root.as_ref(), &variables)
    }
}
