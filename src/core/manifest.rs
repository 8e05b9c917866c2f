//! Declarative list of paths a project is expected to contain

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// What kind of filesystem entry is expected at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    File,
    Dir,
}

impl PathKind {
    /// Check whether `path` exists as this kind of entry
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            PathKind::File => path.is_file(),
            PathKind::Dir => path.is_dir(),
        }
    }
}

/// A single expected path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedPath {
    /// Path relative to the project root
    pub path: String,

    #[serde(default = "default_kind")]
    pub kind: PathKind,

    /// Optional display label; the path is shown when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_kind() -> PathKind {
    PathKind::File
}

impl ExpectedPath {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: PathKind::File,
            label: None,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: PathKind::Dir,
            label: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }
}

/// Ordered list of expected paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,

    #[serde(default)]
    pub paths: Vec<ExpectedPath>,
}

impl Manifest {
    /// Build a manifest of files from a pipeline's artifact list
    pub fn from_artifacts(name: &str, artifacts: &[String]) -> Self {
        Self {
            name: name.to_string(),
            paths: artifacts.iter().map(ExpectedPath::file).collect(),
        }
    }

    /// Load a manifest from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a manifest from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.paths {
            if entry.path.trim().is_empty() {
                anyhow::bail!("Manifest '{}' contains an empty path", self.name);
            }
            if Path::new(&entry.path).is_absolute() {
                anyhow::bail!("Manifest path must be relative: {}", entry.path);
            }
            if !seen.insert(normalize(&entry.path)) {
                anyhow::bail!("Duplicate manifest path: {}", entry.path);
            }
        }
        Ok(())
    }
}

/// `data`, `data/` and `./data` name the same entry
fn normalize(path: &str) -> PathBuf {
    Path::new(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
