//! Dependency helpers handed to release rules
//!
//! [`ManifestEditor`] wraps the model for the duration of one phase and is the
//! only way rules mutate it, so dry-run wording and the "did anything really
//! change" bookkeeping live in one place.

use stepwise_core::{ChangeAction, MigrationResult};

use crate::model::{DependencyDescriptor, ManifestModel};

/// Mutation gate over a [`ManifestModel`]
#[derive(Debug)]
pub struct ManifestEditor<'m> {
    model: &'m mut ManifestModel,
    dry_run: bool,
    mutations: usize,
}

impl<'m> ManifestEditor<'m> {
    /// Wrap a model
    #[inline]
    #[must_use]
    pub fn new(model: &'m mut ManifestModel, dry_run: bool) -> Self {
        Self {
            model,
            dry_run,
            mutations: 0,
        }
    }

    /// Read-only view of the model
    #[inline]
    #[must_use]
    pub fn model(&self) -> &ManifestModel {
        self.model
    }

    /// Whether mutations are only reported
    #[inline]
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Number of real structural mutations applied so far
    #[inline]
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Presence check by `(group, artifact)`
    #[inline]
    #[must_use]
    pub fn has_dependency(&self, group_id: &str, artifact_id: &str) -> bool {
        self.model.has_dependency(group_id, artifact_id)
    }

    /// First dependency matching `(group, artifact)`
    #[inline]
    #[must_use]
    pub fn find_dependency(&self, group_id: &str, artifact_id: &str) -> Option<&DependencyDescriptor> {
        self.model.find_dependency(group_id, artifact_id)
    }

    /// Dependencies belonging to a group
    #[inline]
    #[must_use]
    pub fn dependencies_in_group(&self, group_id: &str) -> Vec<&DependencyDescriptor> {
        self.model.dependencies_in_group(group_id)
    }

    /// Append a dependency unless `(group, artifact)` is already declared
    ///
    /// Returns `true` when the dependency was added (or would be, in dry-run
    /// mode). An existing declaration produces an "already present" change
    /// entry and leaves the list untouched.
    pub fn add_if_absent(
        &mut self,
        dependency: DependencyDescriptor,
        result: &mut MigrationResult,
    ) -> bool {
        if self.has_dependency(&dependency.group_id, &dependency.artifact_id) {
            result.add_change(format!(
                "Dependency {}:{} already present",
                dependency.group_id, dependency.artifact_id
            ));
            return false;
        }

        result.record(self.dry_run, ChangeAction::Add, format!("dependency {dependency}"));
        if !self.dry_run {
            tracing::debug!("Adding dependency {}", dependency);
            self.model.dependencies.push(dependency);
            self.mutations += 1;
        }
        true
    }

    /// Replace the parent version
    ///
    /// Does nothing when the model has no parent.
    pub fn set_parent_version(&mut self, version: &str, result: &mut MigrationResult) {
        let Some(current) = self.model.parent.as_ref().map(|p| p.version.clone()) else {
            return;
        };
        result.record(
            self.dry_run,
            ChangeAction::Update,
            format!("parent version: {current} -> {version}"),
        );
        if !self.dry_run {
            if let Some(parent) = self.model.parent.as_mut() {
                parent.version = version.to_string();
            }
            self.mutations += 1;
        }
    }
}
