//! Configuration file store collaborator

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use walkdir::WalkDir;

use crate::error::ConfigFileError;

/// Kind of configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `application*.properties`
    Properties,
    /// `application*.yml` / `application*.yaml`
    Yaml,
}

impl ConfigFormat {
    /// Detect by file name
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if !name.starts_with("application") {
            return None;
        }
        match path.extension()?.to_str()? {
            "properties" => Some(Self::Properties),
            "yml" | "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Lists, reads and writes configuration files
pub trait ConfigFileStore: Send + Sync {
    /// Configuration files, sorted
    ///
    /// # Errors
    /// [`ConfigFileError::NotFound`] if the project root is missing.
    fn list(&self) -> Result<Vec<PathBuf>, ConfigFileError>;

    /// Read a file
    ///
    /// # Errors
    /// [`ConfigFileError::Io`] on read failure.
    fn read(&self, path: &Path) -> Result<String, ConfigFileError>;

    /// Replace a file's contents
    ///
    /// # Errors
    /// [`ConfigFileError::Io`] on write failure.
    fn write(&self, path: &Path, contents: &str) -> Result<(), ConfigFileError>;
}

/// Default resource directories of a Maven project
pub const DEFAULT_RESOURCE_DIRS: [&str; 2] = ["src/main/resources", "src/test/resources"];

/// Configuration files under a project root
#[derive(Debug, Clone)]
pub struct FsConfigFileStore {
    root: PathBuf,
    resource_dirs: Vec<PathBuf>,
}

impl FsConfigFileStore {
    /// Store over the default resource directories of `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            resource_dirs: DEFAULT_RESOURCE_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// With explicit resource directories, relative to the root
    #[inline]
    #[must_use]
    pub fn with_resource_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.resource_dirs = dirs;
        self
    }
}

impl ConfigFileStore for FsConfigFileStore {
    fn list(&self) -> Result<Vec<PathBuf>, ConfigFileError> {
        if !self.root.is_dir() {
            return Err(ConfigFileError::NotFound(self.root.clone()));
        }
        let mut files = Vec::new();
        for dir in &self.resource_dirs {
            let dir = self.root.join(dir);
            if !dir.is_dir() {
                continue;
            }
            files.extend(
                WalkDir::new(&dir)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .map(walkdir::DirEntry::into_path)
                    .filter(|p| ConfigFormat::detect(p).is_some()),
            );
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String, ConfigFileError> {
        std::fs::read_to_string(path).map_err(|e| ConfigFileError::io_error(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), ConfigFileError> {
        std::fs::write(path, contents).map_err(|e| ConfigFileError::io_error(path, e))?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    files: BTreeMap<PathBuf, String>,
    writes: usize,
    fail_writes: bool,
}

/// In-memory store, mainly for tests and previews
#[derive(Debug, Default)]
pub struct InMemoryConfigFileStore {
    state: Mutex<InMemoryState>,
}

impl InMemoryConfigFileStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.state.lock().files.insert(path.into(), contents.into());
    }

    /// Current contents of a file
    #[must_use]
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().files.get(path.as_ref()).cloned()
    }

    /// Number of successful writes
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Make every subsequent write fail with an IO error
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }
}

impl ConfigFileStore for InMemoryConfigFileStore {
    fn list(&self) -> Result<Vec<PathBuf>, ConfigFileError> {
        Ok(self
            .state
            .lock()
            .files
            .keys()
            .filter(|p| ConfigFormat::detect(p).is_some())
            .cloned()
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, ConfigFileError> {
        self.contents(path).ok_or_else(|| {
            ConfigFileError::io_error(path, std::io::Error::from(std::io::ErrorKind::NotFound))
        })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), ConfigFileError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(ConfigFileError::io_error(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
            ));
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        state.writes += 1;
        Ok(())
    }
}
