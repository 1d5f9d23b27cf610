//! Configuration file errors

use std::path::PathBuf;

use stepwise_core::PhaseError;

/// Errors while listing, reading or writing configuration files
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// Project root does not exist
    #[error("resource root not found: {0}")]
    NotFound(PathBuf),

    /// Malformed YAML document
    #[error("malformed yaml {path}: {source}")]
    Yaml {
        /// Path of the failed operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_yaml::Error,
    },

    /// IO error during read or write
    #[error("io error on {path}: {source}")]
    Io {
        /// Path of the failed operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigFileError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfigFileError> for PhaseError {
    fn from(err: ConfigFileError) -> Self {
        match err {
            ConfigFileError::NotFound(path) => PhaseError::locator("resource root", path),
            ConfigFileError::Yaml { path, source } => PhaseError::parse(path, source.to_string()),
            ConfigFileError::Io { path, source } => PhaseError::io_error(path, source),
        }
    }
}
