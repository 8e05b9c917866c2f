//! Project verification - read-only existence checks against a manifest

use crate::core::manifest::{ExpectedPath, Manifest};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Result of checking one expected path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCheck {
    pub expected: ExpectedPath,
    pub found: bool,
}

/// Outcome of verifying a whole manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub manifest: String,
    pub checks: Vec<PathCheck>,
}

impl VerificationReport {
    pub fn found(&self) -> usize {
        self.checks.iter().filter(|c| c.found).count()
    }

    pub fn missing(&self) -> usize {
        self.checks.len() - self.found()
    }

    pub fn total(&self) -> usize {
        self.checks.len()
    }

    /// True when every expected path is present
    pub fn is_complete(&self) -> bool {
        self.missing() == 0
    }

    pub fn missing_paths(&self) -> impl Iterator<Item = &ExpectedPath> {
        self.checks.iter().filter(|c| !c.found).map(|c| &c.expected)
    }
}

/// Check a single path relative to `root`
pub fn check_path(root: &Path, expected: &ExpectedPath) -> PathCheck {
    let full_path = root.join(&expected.path);
    let found = expected.kind.matches(&full_path);
    debug!("{} {:?}: {}", full_path.display(), expected.kind, if found { "found" } else { "missing" });
    PathCheck {
        expected: expected.clone(),
        found,
    }
}

/// Check every manifest entry; entries are reported in manifest order
pub fn verify_manifest(root: &Path, manifest: &Manifest) -> VerificationReport {
    VerificationReport {
        manifest: manifest.name.clone(),
        checks: manifest
            .paths
            .iter()
            .map(|expected| check_path(root, expected))
            .collect(),
    }
}
