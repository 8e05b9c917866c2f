//! Core domain models
//!
//! Pipelines, steps, run state, manifests, and the built-in definitions.

pub mod config;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod presets;
pub mod state;
pub mod step;

pub use error::RunError;
pub use manifest::{ExpectedPath, Manifest, PathKind};
pub use pipeline::*;
pub use state::*;
pub use step::*;
