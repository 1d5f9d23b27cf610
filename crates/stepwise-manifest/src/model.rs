//! In-memory build manifest
//!
//! Mirrors the parts of a Maven descriptor the rule engine reads or edits:
//! the parent reference, dependencies, dependency management and build
//! plugins. A model read from disk also remembers where those elements live
//! in the original text so the writer can splice edits without reformatting.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Parent reference (`<parent>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentReference {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version
    pub version: String,
}

impl ParentReference {
    /// Create parent reference
    #[inline]
    #[must_use]
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Check group and artifact against a coordinate
    #[inline]
    #[must_use]
    pub fn is(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }
}

/// Dependency entry
///
/// Identity for presence checks is `(group_id, artifact_id)` only; version and
/// scope are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    /// Group id
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
    /// Version, when pinned
    pub version: Option<String>,
    /// Scope, when not `compile`
    pub scope: Option<String>,
}

impl DependencyDescriptor {
    /// Create dependency without version or scope
    #[inline]
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: None,
        }
    }

    /// With version
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// With scope
    #[inline]
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Check identity against a coordinate
    #[inline]
    #[must_use]
    pub fn is(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id && self.artifact_id == artifact_id
    }

    /// Check identity against another descriptor
    #[inline]
    #[must_use]
    pub fn same_coordinate(&self, other: &DependencyDescriptor) -> bool {
        self.is(&other.group_id, &other.artifact_id)
    }
}

impl fmt::Display for DependencyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        if let Some(scope) = &self.scope {
            write!(f, " ({scope})")?;
        }
        Ok(())
    }
}

/// Build plugin entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Group id (Maven defaults it to `org.apache.maven.plugins`)
    pub group_id: String,
    /// Artifact id
    pub artifact_id: String,
}

impl PluginDescriptor {
    /// Create plugin descriptor
    #[inline]
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

/// Where editable elements live in the original document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct SourceLayout {
    /// Original document text
    pub(crate) text: String,
    /// Byte range of the parent `<version>` text
    pub(crate) parent_version: Option<Range<usize>>,
    /// Offset of the project-level `</dependencies>` tag
    pub(crate) dependencies_close: Option<usize>,
    /// Byte range of a project-level `<dependencies/>` element
    pub(crate) dependencies_empty: Option<Range<usize>>,
    /// Offset of the `</project>` tag
    pub(crate) project_close: Option<usize>,
    /// Number of project dependencies present in the original text
    pub(crate) original_dependency_count: usize,
}

/// Mutable manifest tree
///
/// Owned by one rule-engine invocation at a time. Duplicated `(group,
/// artifact)` pairs are a caller error and are not collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestModel {
    /// Parent reference
    pub parent: Option<ParentReference>,
    /// Project dependencies, in document order
    pub dependencies: Vec<DependencyDescriptor>,
    /// `dependencyManagement` entries
    pub dependency_management: Option<Vec<DependencyDescriptor>>,
    /// Build plugins
    pub plugins: Option<Vec<PluginDescriptor>>,
    pub(crate) layout: Option<SourceLayout>,
}

impl ManifestModel {
    /// Create empty model
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With parent reference
    #[inline]
    #[must_use]
    pub fn with_parent(mut self, parent: ParentReference) -> Self {
        self.parent = Some(parent);
        self
    }

    /// With dependency appended
    #[inline]
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyDescriptor) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// With managed dependency appended
    #[inline]
    #[must_use]
    pub fn with_managed_dependency(mut self, dependency: DependencyDescriptor) -> Self {
        self.dependency_management
            .get_or_insert_with(Vec::new)
            .push(dependency);
        self
    }

    /// With build plugin appended
    #[inline]
    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginDescriptor) -> Self {
        self.plugins.get_or_insert_with(Vec::new).push(plugin);
        self
    }

    /// Check presence of a dependency by `(group, artifact)`
    #[inline]
    #[must_use]
    pub fn has_dependency(&self, group_id: &str, artifact_id: &str) -> bool {
        self.find_dependency(group_id, artifact_id).is_some()
    }

    /// First dependency matching `(group, artifact)`
    #[inline]
    #[must_use]
    pub fn find_dependency(&self, group_id: &str, artifact_id: &str) -> Option<&DependencyDescriptor> {
        self.dependencies.iter().find(|d| d.is(group_id, artifact_id))
    }

    /// All dependencies in a group
    #[must_use]
    pub fn dependencies_in_group(&self, group_id: &str) -> Vec<&DependencyDescriptor> {
        self.dependencies
            .iter()
            .filter(|d| d.group_id == group_id)
            .collect()
    }

    /// All dependencies whose artifact id contains `needle`
    #[must_use]
    pub fn dependencies_matching(&self, needle: &str) -> Vec<&DependencyDescriptor> {
        self.dependencies
            .iter()
            .filter(|d| d.artifact_id.contains(needle))
            .collect()
    }

    /// First managed dependency matching `(group, artifact)`
    #[must_use]
    pub fn find_managed_dependency(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Option<&DependencyDescriptor> {
        self.dependency_management
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|d| d.is(group_id, artifact_id))
    }

    /// Check presence of a build plugin
    #[must_use]
    pub fn has_plugin(&self, group_id: &str, artifact_id: &str) -> bool {
        self.plugins
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|p| p.group_id == group_id && p.artifact_id == artifact_id)
    }

    /// Check if the model was read from an existing document
    #[inline]
    #[must_use]
    pub fn has_source(&self) -> bool {
        self.layout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ManifestModel {
        ManifestModel::new()
            .with_parent(ParentReference::new(
                "org.springframework.boot",
                "spring-boot-starter-parent",
                "2.2.13.RELEASE",
            ))
            .with_dependency(DependencyDescriptor::new(
                "org.springframework.boot",
                "spring-boot-starter-web",
            ))
            .with_dependency(
                DependencyDescriptor::new("com.datastax.cassandra", "cassandra-driver-core")
                    .with_version("3.10.2"),
            )
            .with_dependency(
                DependencyDescriptor::new("org.springframework.boot", "spring-boot-starter-test")
                    .with_scope("test"),
            )
    }

    #[test]
    fn presence_ignores_version_and_scope() {
        let m = model();
        assert!(m.has_dependency("com.datastax.cassandra", "cassandra-driver-core"));
        assert!(m.has_dependency("org.springframework.boot", "spring-boot-starter-test"));
        assert!(!m.has_dependency("com.datastax.cassandra", "cassandra-driver-mapping"));
    }

    #[test]
    fn find_returns_first_match() {
        let m = model().with_dependency(
            DependencyDescriptor::new("com.datastax.cassandra", "cassandra-driver-core")
                .with_version("4.0.0"),
        );
        let found = m
            .find_dependency("com.datastax.cassandra", "cassandra-driver-core")
            .unwrap();
        assert_eq!(found.version.as_deref(), Some("3.10.2"));
    }

    #[test]
    fn filter_by_group() {
        let m = model();
        assert_eq!(m.dependencies_in_group("org.springframework.boot").len(), 2);
        assert!(m.dependencies_in_group("io.searchbox").is_empty());
    }

    #[test]
    fn managed_and_plugins_optional() {
        let m = model();
        assert!(m.find_managed_dependency("org.springframework.cloud", "spring-cloud-dependencies").is_none());
        assert!(!m.has_plugin("com.spotify", "dockerfile-maven-plugin"));

        let m = m
            .with_managed_dependency(
                DependencyDescriptor::new("org.springframework.cloud", "spring-cloud-dependencies")
                    .with_version("Hoxton.SR8"),
            )
            .with_plugin(PluginDescriptor::new("com.spotify", "dockerfile-maven-plugin"));
        assert!(m.find_managed_dependency("org.springframework.cloud", "spring-cloud-dependencies").is_some());
        assert!(m.has_plugin("com.spotify", "dockerfile-maven-plugin"));
    }

    #[test]
    fn descriptor_display() {
        let dep = DependencyDescriptor::new("junit", "junit")
            .with_version("4.13")
            .with_scope("test");
        assert_eq!(dep.to_string(), "junit:junit:4.13 (test)");
    }
}
