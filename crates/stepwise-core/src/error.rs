//! Error types for migration phases
//!
//! Provides the failure taxonomy shared by every phase:
//! - Locator failures (manifest or source root not found)
//! - Parse failures (malformed manifest or source file)
//! - Write failures (persisting a mutated artifact)
//! - Validation failures (external build command returned non-zero)
//!
//! Ambiguous transformations have no variant here: they are reported as a
//! warning plus a manual review item, never as an error.

use std::path::PathBuf;

/// Errors a phase may return from `migrate()`
///
/// The driver converts any of these into an error entry of the phase's result;
/// none of them aborts the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PhaseError {
    /// Required artifact could not be located
    #[error("{what} not found at {path}")]
    Locator {
        /// Kind of artifact, e.g. `source root`
        what: String,
        /// Path that was looked up
        path: PathBuf,
    },

    /// Artifact exists but could not be parsed
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Artifact that failed to parse
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// Persisting a mutated artifact failed
    #[error("failed to write {path}: {message}")]
    Write {
        /// Artifact that was being written
        path: PathBuf,
        /// Underlying failure
        message: String,
    },

    /// External validation command failed
    #[error("validation failed: {0}")]
    Validation(String),

    /// IO error outside of a specific artifact write
    #[error("io error at {path}: {source}")]
    Io {
        /// Path of the failed operation
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl PhaseError {
    /// Create locator error
    pub fn locator(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Locator {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Create parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create write error
    pub fn write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this is a locator failure
    #[inline]
    #[must_use]
    pub fn is_locator(&self) -> bool {
        matches!(self, Self::Locator { .. })
    }
}

/// Errors while loading `stepwise.toml`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config
    #[error("io error reading {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("invalid config {path}: {source}")]
    Toml {
        /// Config file path
        path: PathBuf,
        /// Deserialization error
        #[source]
        source: toml::de::Error,
    },

    /// Semantically invalid value
    #[error("invalid config value for '{field}': {message}")]
    Invalid {
        /// Offending field name
        field: String,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create invalid value error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}
