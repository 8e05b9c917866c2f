//! Test: Verification - manifest checks against a real directory tree

use analytics_pipeline::core::presets::{self, PipelinePreset};
use analytics_pipeline::core::{ExpectedPath, Manifest};
use analytics_pipeline::verification::verify_manifest;
use std::fs;
use std::path::Path;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "").unwrap();
}

/// 5 of 7 expected files present: 5 found, 2 missing, incomplete
#[test]
fn test_partial_project_is_incomplete() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<String> = (1..=7).map(|i| format!("file{}.txt", i)).collect();
    for file in &files[..5] {
        touch(dir.path(), file);
    }
    let manifest = Manifest {
        name: "Seven files".to_string(),
        paths: files.iter().map(ExpectedPath::file).collect(),
    };

    let report = verify_manifest(dir.path(), &manifest);

    assert_eq!(report.found(), 5);
    assert_eq!(report.missing(), 2);
    assert!(!report.is_complete());
}

/// The built-in project layout passes on a complete tree and is stable
#[test]
fn test_complete_project_layout() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = presets::project_manifest().unwrap();
    for entry in &manifest.paths {
        match entry.kind {
            analytics_pipeline::core::PathKind::Dir => {
                fs::create_dir_all(dir.path().join(&entry.path)).unwrap()
            }
            analytics_pipeline::core::PathKind::File => touch(dir.path(), &entry.path),
        }
    }

    let first = verify_manifest(dir.path(), &manifest);
    let second = verify_manifest(dir.path(), &manifest);

    assert!(first.is_complete(), "missing: {:?}", first.missing_paths().collect::<Vec<_>>());
    assert_eq!(first, second);
}

/// Removing one script is the only thing reported
#[test]
fn test_missing_script_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = presets::project_manifest().unwrap();
    for entry in &manifest.paths {
        match entry.kind {
            analytics_pipeline::core::PathKind::Dir => {
                fs::create_dir_all(dir.path().join(&entry.path)).unwrap()
            }
            analytics_pipeline::core::PathKind::File => touch(dir.path(), &entry.path),
        }
    }
    fs::remove_file(dir.path().join("scripts/04_rfm_segmentation.py")).unwrap();

    let report = verify_manifest(dir.path(), &manifest);

    let missing: Vec<_> = report.missing_paths().map(|p| p.path.clone()).collect();
    assert_eq!(missing, vec!["scripts/04_rfm_segmentation.py"]);
}

/// Artifacts of the analytics pipeline can be verified after a run
#[test]
fn test_artifact_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelinePreset::Analytics.config().unwrap();
    let manifest = Manifest::from_artifacts("Analytics artifacts", &config.artifacts);

    let empty = verify_manifest(dir.path(), &manifest);
    assert_eq!(empty.found(), 0);
    assert_eq!(empty.missing(), config.artifacts.len());

    for artifact in &config.artifacts {
        touch(dir.path(), artifact);
    }
    assert!(verify_manifest(dir.path(), &manifest).is_complete());
}
