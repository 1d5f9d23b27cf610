//! Stepwise Pipeline
//!
//! Drives one framework upgrade step end to end:
//! - [`MigrationPipeline`]: runs phases by ascending priority with per-phase
//!   failure isolation, then validation
//! - [`PipelineReport`]: per-phase results, merged view, text/JSON rendering,
//!   exit code
//! - [`PostMigrationValidator`]: external build run per [`ValidationLevel`]
//! - [`catalog`]: phases for a [`MigrationConfig`](stepwise_core::MigrationConfig)
//! - [`logging`]: subscriber setup used by the `stepwise` binary

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod validator;

pub use catalog::{boundary_for, build_pipeline, build_pipeline_with, phases_for};
pub use error::{CommandError, PipelineError};
pub use logging::LogFormat;
pub use pipeline::{MigrationPipeline, PhaseReport, PipelineReport};
pub use validator::{
    CommandOutput, CommandRunner, PostMigrationValidator, ProcessRunner, ValidationLevel,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
