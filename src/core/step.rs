//! Step domain model

use crate::core::config::StepConfig;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// A single step in a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Position in the pipeline (1-based)
    pub index: usize,

    /// Number of steps in the pipeline
    pub total: usize,

    /// Display label
    pub name: String,

    /// Program followed by its arguments, placeholders already substituted
    pub command: Vec<String>,

    /// Directory to run in, relative to the project root
    pub working_dir: Option<PathBuf>,
}

impl Step {
    /// Create a step from a step config, substituting `{{ name }}` placeholders
    ///
    /// Returns the names of any placeholders that had no value.
    pub fn from_config(
        config: &StepConfig,
        index: usize,
        total: usize,
        variables: &HashMap<String, String>,
    ) -> Result<Self, Vec<String>> {
        let mut missing = Vec::new();
        let command = config
            .command
            .iter()
            .map(|arg| render_arg(arg, variables, &mut missing))
            .collect();

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(missing);
        }

        Ok(Step {
            index,
            total,
            name: config.name.clone(),
            command,
            working_dir: config.working_dir.as_ref().map(PathBuf::from),
        })
    }

    /// Program to execute
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments passed to the program
    pub fn args(&self) -> &[String] {
        self.command.get(1..).unwrap_or(&[])
    }

    /// Directory the command runs in
    pub fn resolve_working_dir(&self, root: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        }
    }

    /// Command line as shown to the user
    pub fn display_command(&self) -> String {
        self.command
            .iter()
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Replace `{{ name }}` placeholders in a single argument
fn render_arg(arg: &str, variables: &HashMap<String, String>, missing: &mut Vec<String>) -> String {
    placeholder_regex()
        .replace_all(arg, |caps: &Captures| {
            let key = &caps[1];
            match variables.get(key) {
                Some(value) => value.clone(),
                None => {
                    missing.push(key.to_string());
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
