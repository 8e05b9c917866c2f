//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{ListCommand, RunCommand, ValidateCommand, VerifyCommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// Runs the analytics scripts, publishes the project, and verifies its layout
///
/// Without a subcommand the built-in analytics pipeline is run.
#[derive(Debug, Parser, Clone)]
#[command(name = "analytics-pipeline")]
#[command(author = "Analytics Pipeline Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Runs and verifies the e-commerce analytics project", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub root: PathBuf,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run a pipeline, stopping at the first failing step
    Run(RunCommand),

    /// Check that the expected project files exist
    Verify(VerifyCommand),

    /// Validate a pipeline or manifest file
    Validate(ValidateCommand),

    /// List built-in pipelines and manifests
    List(ListCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// The command to execute; running the analytics pipeline when none is given
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Run(RunCommand::default()))
    }
}
