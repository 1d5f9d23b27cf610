//! Release-boundary dependency rules
//!
//! [`ReleaseRules`] is the strategy slot the manifest engine calls after the
//! parent update. [`ReleaseBoundary`] implements it by dispatching to one
//! table per boundary:
//! - [`IntegrationCheck`]: presence of a third-party integration produces a
//!   warning describing the breaking change
//! - [`CompatibilityRule`]: a managed version is classified as compatible,
//!   marginal or incompatible

mod boot_2_3;
mod boot_2_4;
mod boot_2_5;

use stepwise_core::{MigrationResult, ReleaseBoundary};

use crate::editor::ManifestEditor;
use crate::model::ManifestModel;

/// Version-specific hooks of the manifest engine
pub trait ReleaseRules: Send + Sync {
    /// Human-readable rule set name
    fn name(&self) -> String;

    /// Presence checks and dependency additions
    fn apply_dependency_rules(&self, editor: &mut ManifestEditor<'_>, result: &mut MigrationResult);

    /// Checks against versions pinned in the manifest
    fn validate_requirements(&self, model: &ManifestModel, result: &mut MigrationResult);
}

impl ReleaseRules for ReleaseBoundary {
    fn name(&self) -> String {
        format!("Spring Boot {}", self.label())
    }

    fn apply_dependency_rules(&self, editor: &mut ManifestEditor<'_>, result: &mut MigrationResult) {
        match self {
            ReleaseBoundary::Boot2_3 => boot_2_3::apply_dependency_rules(editor, result),
            ReleaseBoundary::Boot2_4 => boot_2_4::apply_dependency_rules(editor, result),
            ReleaseBoundary::Boot2_5 => boot_2_5::apply_dependency_rules(editor, result),
        }
    }

    fn validate_requirements(&self, model: &ManifestModel, result: &mut MigrationResult) {
        let rules = match self {
            ReleaseBoundary::Boot2_3 => boot_2_3::COMPATIBILITY,
            ReleaseBoundary::Boot2_4 => boot_2_4::COMPATIBILITY,
            ReleaseBoundary::Boot2_5 => boot_2_5::COMPATIBILITY,
        };
        for rule in rules {
            rule.check(model, result);
        }
    }
}

/// How an integration is recognised in the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detect {
    /// Exact `(group, artifact)` dependency
    Coordinate(&'static str, &'static str),
    /// Any dependency in the group
    Group(&'static str),
    /// Any dependency whose artifact id contains the text
    ArtifactContains(&'static str),
    /// Build plugin `(group, artifact)`
    Plugin(&'static str, &'static str),
}

impl Detect {
    /// Coordinates in the model matched by this detector
    #[must_use]
    pub fn matches(&self, model: &ManifestModel) -> Vec<String> {
        let coordinate = |d: &&crate::model::DependencyDescriptor| {
            format!("{}:{}", d.group_id, d.artifact_id)
        };
        match *self {
            Detect::Coordinate(group, artifact) => model
                .find_dependency(group, artifact)
                .iter()
                .map(coordinate)
                .collect(),
            Detect::Group(group) => model.dependencies_in_group(group).iter().map(coordinate).collect(),
            Detect::ArtifactContains(needle) => {
                model.dependencies_matching(needle).iter().map(coordinate).collect()
            }
            Detect::Plugin(group, artifact) => {
                if model.has_plugin(group, artifact) {
                    vec![format!("{group}:{artifact}")]
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// Third-party integration affected by a release boundary
#[derive(Debug, Clone, Copy)]
pub struct IntegrationCheck {
    /// Integration name used in messages
    pub name: &'static str,
    /// Detector
    pub detect: Detect,
    /// Breaking change and remediation
    pub warning: &'static str,
    /// Review item added when the change needs code edits
    pub review_item: Option<&'static str>,
}

impl IntegrationCheck {
    /// Emit the warning (and review item) if the integration is present
    ///
    /// Returns whether the integration was detected.
    pub fn check(&self, model: &ManifestModel, result: &mut MigrationResult) -> bool {
        let found = self.detect.matches(model);
        if found.is_empty() {
            return false;
        }
        let warning = format!("{} detected ({}): {}", self.name, found.join(", "), self.warning);
        tracing::debug!("{}", warning);
        match self.review_item {
            Some(item) => result.add_ambiguity(warning, item),
            None => result.add_warning(warning),
        }
        true
    }
}

/// Run every check of a table against the model
pub(crate) fn check_integrations(
    checks: &[IntegrationCheck],
    model: &ManifestModel,
    result: &mut MigrationResult,
) {
    for check in checks {
        check.check(model, result);
    }
}

/// Outcome of a [`CompatibilityRule`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Known to work with the target release
    Compatible,
    /// Works, but an upgrade is recommended
    Marginal,
    /// Below the minimum supported version
    Incompatible,
}

/// Known-compatible version prefixes for one managed dependency
#[derive(Debug, Clone, Copy)]
pub struct CompatibilityRule {
    /// Display name
    pub name: &'static str,
    /// Managed dependency group
    pub group_id: &'static str,
    /// Managed dependency artifact
    pub artifact_id: &'static str,
    /// Prefixes classified as compatible
    pub compatible: &'static [&'static str],
    /// Prefixes classified as marginal
    pub marginal: &'static [&'static str],
    /// Minimum version named in the incompatibility error
    pub minimum: &'static str,
}

impl CompatibilityRule {
    /// Classify a version string
    #[must_use]
    pub fn classify(&self, version: &str) -> Compatibility {
        if self.compatible.iter().any(|p| version.starts_with(p)) {
            Compatibility::Compatible
        } else if self.marginal.iter().any(|p| version.starts_with(p)) {
            Compatibility::Marginal
        } else {
            Compatibility::Incompatible
        }
    }

    /// Check the managed entry in `model`; records nothing if it is absent
    pub fn check(&self, model: &ManifestModel, result: &mut MigrationResult) {
        let Some(version) = model
            .find_managed_dependency(self.group_id, self.artifact_id)
            .and_then(|d| d.version.as_deref())
        else {
            return;
        };

        match self.classify(version) {
            Compatibility::Compatible => {
                result.add_change(format!("{} {version} is compatible", self.name));
            }
            Compatibility::Marginal => result.add_warning(format!(
                "{} {version} is marginally compatible; upgrade to {} or later is recommended",
                self.name, self.minimum
            )),
            Compatibility::Incompatible => result.add_error(format!(
                "{} {version} is not compatible; minimum required version is {}",
                self.name, self.minimum
            )),
        }
    }
}
