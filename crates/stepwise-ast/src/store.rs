//! Source-unit store collaborator
//!
//! The loader result is handed to each rewrite phase as a value
//! ([`SourceSet`]); phases clone what they transform and return only the
//! units they actually changed to [`SourceStore::write_back`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::unit::SourceUnit;

/// Unit name -> unit, ordered by name
pub type SourceSet = BTreeMap<String, SourceUnit>;

/// Loads and persists source units
pub trait SourceStore: Send + Sync {
    /// Load every parseable unit
    ///
    /// Unparseable files are absent from the set.
    ///
    /// # Errors
    /// [`SourceError::NotFound`] if the source root is missing.
    fn load_all(&self) -> Result<SourceSet, SourceError>;

    /// Persist modified units
    ///
    /// # Errors
    /// [`SourceError::Io`] or [`SourceError::Unbound`] on the first failed unit.
    fn write_back(&self, units: &SourceSet) -> Result<(), SourceError>;
}

/// Default source directories of a Maven project
pub const DEFAULT_SOURCE_DIRS: [&str; 2] = ["src/main/java", "src/test/java"];

/// Java sources under a project root
#[derive(Debug, Clone)]
pub struct FsSourceStore {
    root: PathBuf,
    source_dirs: Vec<PathBuf>,
}

impl FsSourceStore {
    /// Store over the default source directories of `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            source_dirs: DEFAULT_SOURCE_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// With explicit source directories, relative to the root
    #[inline]
    #[must_use]
    pub fn with_source_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.source_dirs = dirs;
        self
    }

    /// Project root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_file(path: &Path) -> Result<SourceUnit, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::io_error(path, e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let unit = SourceUnit::parse(stem.clone(), text)?;
        let name = match unit.package_name() {
            Some(package) => format!("{package}.{stem}"),
            None => stem,
        };
        Ok(unit.with_name(name).with_path(path))
    }
}

impl SourceStore for FsSourceStore {
    fn load_all(&self) -> Result<SourceSet, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound(self.root.clone()));
        }

        let mut units = SourceSet::new();
        for dir in &self.source_dirs {
            let dir = self.root.join(dir);
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!("Skipping unreadable entry under {}: {}", dir.display(), err);
                        continue;
                    }
                };
                let path = entry.path();
                if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("java") {
                    continue;
                }
                match Self::load_file(path) {
                    Ok(unit) => {
                        if units.contains_key(unit.name()) {
                            tracing::warn!("Duplicate unit {} at {}, keeping first", unit.name(), path.display());
                            continue;
                        }
                        units.insert(unit.name().to_string(), unit);
                    }
                    Err(err) => tracing::warn!("Skipping {}: {}", path.display(), err),
                }
            }
        }

        tracing::debug!("Loaded {} source units from {}", units.len(), self.root.display());
        Ok(units)
    }

    fn write_back(&self, units: &SourceSet) -> Result<(), SourceError> {
        for (name, unit) in units {
            let path = unit.path().ok_or_else(|| SourceError::Unbound(name.clone()))?;
            std::fs::write(path, unit.text()).map_err(|e| SourceError::io_error(path, e))?;
            tracing::info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryState {
    units: SourceSet,
    writes: usize,
    fail_writes: bool,
}

/// In-memory store, mainly for tests and previews
#[derive(Debug, Default)]
pub struct InMemorySourceStore {
    state: Mutex<InMemoryState>,
}

impl InMemorySourceStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a unit
    ///
    /// # Errors
    /// [`SourceError::Syntax`] if the text does not parse.
    pub fn add_source(&self, name: &str, text: &str) -> Result<(), SourceError> {
        let unit = SourceUnit::parse(name, text)?;
        self.state.lock().units.insert(name.to_string(), unit);
        Ok(())
    }

    /// Current text of a unit
    #[must_use]
    pub fn text_of(&self, name: &str) -> Option<String> {
        self.state.lock().units.get(name).map(|u| u.text().to_string())
    }

    /// Number of `write_back` calls that succeeded
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Make every subsequent write fail with an IO error
    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }
}

impl SourceStore for InMemorySourceStore {
    fn load_all(&self) -> Result<SourceSet, SourceError> {
        Ok(self.state.lock().units.clone())
    }

    fn write_back(&self, units: &SourceSet) -> Result<(), SourceError> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(SourceError::io_error(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
            ));
        }
        for (name, unit) in units {
            state.units.insert(name.clone(), unit.clone());
        }
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn fs_store_names_units_by_package() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/java/com/acme/App.java", "package com.acme;\nclass App {}\n");
        write(dir.path(), "src/test/java/com/acme/AppTest.java", "package com.acme;\nclass AppTest {}\n");
        write(dir.path(), "src/main/java/Broken.java", "class Broken {");
        write(dir.path(), "src/main/resources/app.txt", "not java");

        let units = FsSourceStore::new(dir.path()).load_all().unwrap();
        let names: Vec<_> = units.keys().cloned().collect();
        assert_eq!(names, ["com.acme.App", "com.acme.AppTest"]);
        assert!(units["com.acme.App"].path().is_some());
    }

    #[test]
    fn fs_store_missing_root() {
        let err = FsSourceStore::new("/definitely/not/here").load_all().unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn fs_store_write_back() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/java/App.java", "class App {}\n");
        let store = FsSourceStore::new(dir.path());

        let mut units = store.load_all().unwrap();
        let unit = units.get_mut("App").unwrap();
        unit.splice(0..0, "// migrated\n").unwrap();
        store.write_back(&units).unwrap();

        let text = std::fs::read_to_string(dir.path().join("src/main/java/App.java")).unwrap();
        assert_eq!(text, "// migrated\nclass App {}\n");
    }

    #[test]
    fn unbound_unit_cannot_be_written() {
        let mut units = SourceSet::new();
        units.insert("A".into(), SourceUnit::parse("A", "class A {}").unwrap());
        let err = FsSourceStore::new(".").write_back(&units).unwrap_err();
        assert!(matches!(err, SourceError::Unbound(_)));
    }

    #[test]
    fn in_memory_store_round_trip() {
        let store = InMemorySourceStore::new();
        store.add_source("A", "class A {}").unwrap();
        assert!(store.add_source("B", "class B {").is_err());

        let mut units = store.load_all().unwrap();
        assert_eq!(units.len(), 1);
        units.get_mut("A").unwrap().splice(0..0, "final ").unwrap();
        store.write_back(&units).unwrap();

        assert_eq!(store.text_of("A").as_deref(), Some("final class A {}"));
        assert_eq!(store.write_count(), 1);
    }
}
