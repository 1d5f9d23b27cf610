//! Driver and external-command errors

use stepwise_core::ConfigError;

/// Errors raised while assembling a pipeline
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No release boundary upgrades to the requested version
    #[error("no release boundary targets version '{0}' (supported: 2.3.x, 2.4.x, 2.5.x)")]
    UnsupportedTarget(String),

    /// Report could not be serialized
    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Errors invoking an external command
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Process could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CommandError {
    /// Create spawn error
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}
