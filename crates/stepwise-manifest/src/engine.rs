//! Manifest rule engine
//!
//! Fixed algorithm per run:
//! 1. Read the manifest (a missing or malformed file ends the phase with an
//!    error entry)
//! 2. Move the framework parent to the target version unless it is already
//!    on the same major.minor line
//! 3. Release-specific dependency rules
//! 4. Release-specific requirement checks
//! 5. Write back only if a real mutation happened

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stepwise_core::prelude::*;
use stepwise_core::{compare_versions, same_minor_line, FrameworkCoordinate};

use crate::editor::ManifestEditor;
use crate::pom::ManifestStore;
use crate::rules::ReleaseRules;

/// Manifest phase
pub struct ManifestMigrator {
    name: String,
    store: Arc<dyn ManifestStore>,
    manifest_path: PathBuf,
    framework: FrameworkCoordinate,
    target_version: String,
    rules: Box<dyn ReleaseRules>,
    dry_run: bool,
}

impl std::fmt::Debug for ManifestMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestMigrator")
            .field("name", &self.name)
            .field("manifest_path", &self.manifest_path)
            .field("target_version", &self.target_version)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ManifestMigrator {
    /// Create phase for the default framework coordinate, real mode
    #[must_use]
    pub fn new(
        store: Arc<dyn ManifestStore>,
        manifest_path: impl Into<PathBuf>,
        target_version: impl Into<String>,
        rules: Box<dyn ReleaseRules>,
    ) -> Self {
        Self {
            name: format!("Manifest rules ({})", rules.name()),
            store,
            manifest_path: manifest_path.into(),
            framework: FrameworkCoordinate::default(),
            target_version: target_version.into(),
            rules,
            dry_run: false,
        }
    }

    /// With dry-run mode
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With expected framework parent coordinate
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: FrameworkCoordinate) -> Self {
        self.framework = framework;
        self
    }

    /// Manifest location
    #[inline]
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    fn update_parent(&self, editor: &mut ManifestEditor<'_>, result: &mut MigrationResult) {
        let Some(parent) = editor.model().parent.clone() else {
            result.add_warning("No parent reference found; framework version not updated");
            return;
        };

        if !parent.is(&self.framework.group_id, &self.framework.artifact_id) {
            result.add_warning(format!(
                "Parent {}:{} is not {}:{}; framework version not updated",
                parent.group_id, parent.artifact_id, self.framework.group_id, self.framework.artifact_id
            ));
            return;
        }

        if same_minor_line(&parent.version, &self.target_version) {
            tracing::debug!(
                "Parent {} already on the {} line",
                parent.version,
                self.target_version
            );
            return;
        }

        if compare_versions(&parent.version, &self.target_version) == Ordering::Greater {
            result.add_warning(format!(
                "Target version {} is older than current parent version {}",
                self.target_version, parent.version
            ));
        }
        editor.set_parent_version(&self.target_version, result);
    }
}

impl MigrationPhase for ManifestMigrator {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        priority::MANIFEST
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn migrate(&self) -> Result<MigrationResult, PhaseError> {
        let path = self.manifest_path.as_path();
        tracing::info!("Migrating manifest {}", path.display());
        let mut result = MigrationResult::new();

        let mut model = match self.store.read(path) {
            Ok(model) => model,
            Err(err) => {
                let err = PhaseError::from(err);
                tracing::error!("Cannot load manifest: {}", err);
                result.add_error(format!("Cannot load manifest: {err}"));
                return Ok(result);
            }
        };

        let mutations = {
            let mut editor = ManifestEditor::new(&mut model, self.dry_run);
            self.update_parent(&mut editor, &mut result);
            self.rules.apply_dependency_rules(&mut editor, &mut result);
            editor.mutation_count()
        };
        self.rules.validate_requirements(&model, &mut result);

        if mutations > 0 && !self.dry_run {
            match self.store.write(path, &model) {
                Ok(()) => result.mark_modified(path.display().to_string()),
                Err(err) => {
                    tracing::error!("Manifest write failed: {}", err);
                    result.add_error(format!(
                        "Failed to write {} after {mutations} change(s) were computed: {err}",
                        path.display()
                    ));
                }
            }
        }

        tracing::info!(
            "Manifest phase finished: {} changes, {} warnings, {} errors",
            result.changes().len(),
            result.warnings().len(),
            result.errors().len()
        );
        Ok(result)
    }
}
