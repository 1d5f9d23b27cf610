//! Manifest collaborator errors

use std::path::PathBuf;

use stepwise_core::PhaseError;

/// Errors while reading or writing a build manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest file does not exist
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),

    /// Malformed manifest document
    #[error("malformed manifest {path}: {message}")]
    Parse {
        /// Path of the failed operation
        path: PathBuf,
        /// Diagnostic text
        message: String,
    },

    /// Model cannot be expressed in the original document
    #[error("cannot render manifest {path}: {message}")]
    Render {
        /// Path of the failed operation
        path: PathBuf,
        /// Diagnostic text
        message: String,
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

impl ManifestError {
    /// Create parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create render error
    pub fn render(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Render {
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
}

impl From<ManifestError> for PhaseError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::NotFound(path) => PhaseError::locator("manifest", path),
            ManifestError::Parse { path, message } => PhaseError::parse(path, message),
            ManifestError::Render { path, message } => PhaseError::write(path, message),
            ManifestError::Io { path, source } => PhaseError::write(path, source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_locator() {
        let err: PhaseError = ManifestError::NotFound(PathBuf::from("pom.xml")).into();
        assert!(err.is_locator());
    }

    #[test]
    fn parse_maps_to_parse() {
        let err: PhaseError = ManifestError::parse("pom.xml", "bad tag").into();
        assert!(matches!(err, PhaseError::Parse { .. }));
    }
}
