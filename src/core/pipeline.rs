//! Pipeline domain model

use crate::core::{config::PipelineConfig, step::Step};
use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// A pipeline ready to run: ordered steps bound to a project root
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Project root that step working directories are relative to
    pub root: PathBuf,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Paths the pipeline is expected to produce
    pub artifacts: Vec<String>,
}

impl Pipeline {
    /// Create a pipeline from configuration
    pub fn from_config(
        config: &PipelineConfig,
        root: &Path,
        variables: &HashMap<String, String>,
    ) -> Result<Self> {
        let total = config.steps.len();
        let mut steps = Vec::with_capacity(total);

        for (i, step_config) in config.steps.iter().enumerate() {
            let step = Step::from_config(step_config, i + 1, total, variables).map_err(|missing| {
                anyhow::anyhow!(
                    "Step '{}' uses undefined variable(s): {} (pass them with --variable key=value)",
                    step_config.name,
                    missing.join(", ")
                )
            })?;
            steps.push(step);
        }

        Ok(Pipeline {
            name: config.name.clone(),
            root: root.to_path_buf(),
            steps,
            artifacts: config.artifacts.clone(),
        })
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Distinct programs the pipeline invokes, each paired with the
    /// directory it is launched from, sorted
    ///
    /// A program containing a path separator is resolved against that
    /// directory rather than `PATH`.
    pub fn required_programs(&self) -> Vec<(String, PathBuf)> {
        self.steps
            .iter()
            .map(|s| (s.program().to_string(), s.resolve_working_dir(&self.root)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
