//! Source collaborator and rewrite errors

use std::path::PathBuf;

use stepwise_core::PhaseError;

/// Errors while loading, editing or writing source units
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Source root does not exist
    #[error("source root not found: {0}")]
    NotFound(PathBuf),

    /// Grammar could not be loaded into the parser
    #[error("parser initialization failed: {0}")]
    Parser(String),

    /// Source text does not parse cleanly
    #[error("syntax error in {unit} at {line}:{column}")]
    Syntax {
        /// Unit name
        unit: String,
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
    },

    /// Edit rejected, the unit was left untouched
    #[error("rejected edit in {unit}: {message}")]
    InvalidEdit {
        /// Unit name
        unit: String,
        /// Diagnostic text
        message: String,
    },

    /// Unit has no file to be written to
    #[error("unit {0} has no backing file")]
    Unbound(String),

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

impl SourceError {
    /// Create invalid edit error
    pub fn invalid_edit(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEdit {
            unit: unit.into(),
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
}

impl From<SourceError> for PhaseError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(path) => PhaseError::locator("source root", path),
            SourceError::Syntax { ref unit, .. } => PhaseError::parse(unit.clone(), err.to_string()),
            SourceError::Io { path, source } => PhaseError::io_error(path, source),
            SourceError::Unbound(ref unit) | SourceError::InvalidEdit { ref unit, .. } => {
                PhaseError::write(unit.clone(), err.to_string())
            }
            SourceError::Parser(message) => PhaseError::parse("<grammar>", message),
        }
    }
}
