//! Command executor - launches a step's external process and waits for it

use crate::core::{RunError, Step, StepOutcome};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Trait for running step commands - allows for different implementations
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Check that `program` can be launched from `working_dir` before any
    /// step runs
    fn is_available(&self, program: &str, working_dir: &Path) -> bool;

    /// Run the step's command in `working_dir` and wait for it to exit
    async fn run(&self, step: &Step, working_dir: &Path) -> Result<StepOutcome, RunError>;
}

/// Executor that spawns real child processes
///
/// The child inherits stdin, stdout and stderr so its own output streams
/// straight to the terminal.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    /// Directories searched for bare program names
    search_path: Option<OsString>,
}

impl ProcessExecutor {
    /// Create an executor that searches the current `PATH`
    pub fn new() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Create an executor with an explicit search path
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    /// Locate a bare program name on the search path
    pub fn find_program(&self, program: &str) -> Option<PathBuf> {
        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .flat_map(|dir| candidates(&dir, program))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    fn is_available(&self, program: &str, working_dir: &Path) -> bool {
        let path = Path::new(program);
        if path.components().count() > 1 {
            // Relative paths are spawned from the step's working directory
            return is_executable(&working_dir.join(path));
        }
        self.find_program(program).is_some()
    }

    async fn run(&self, step: &Step, working_dir: &Path) -> Result<StepOutcome, RunError> {
        if !working_dir.is_dir() {
            return Err(RunError::Spawn {
                step: step.name.clone(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("working directory {} does not exist", working_dir.display()),
                ),
            });
        }

        debug!(
            "Spawning '{}' in {}",
            step.display_command(),
            working_dir.display()
        );

        let mut command = Command::new(step.program());
        command
            .args(step.args())
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(search_path) = &self.search_path {
            command.env("PATH", search_path);
        }

        let status = command.status().await.map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                RunError::ToolNotFound {
                    program: step.program().to_string(),
                }
            } else {
                RunError::Spawn {
                    step: step.name.clone(),
                    source: e,
                }
            }
        })?;

        let outcome = StepOutcome::from_exit_code(status.code());
        if !outcome.succeeded {
            warn!("'{}' exited with {:?}", step.display_command(), status.code());
        }

        Ok(outcome)
    }
}

fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let mut found = vec![dir.join(program)];
    if cfg!(windows) && Path::new(program).extension().is_none() {
        found.push(dir.join(format!("{}.exe", program)));
    }
    found
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
