//! Migration configuration
//!
//! Loaded from `stepwise.toml`; every field has a default so a minimal file
//! only needs `target_version`.
//!
//! ```toml
//! target_version = "2.3.12.RELEASE"
//! dry_run = true
//!
//! [validation]
//! levels = ["compile", "test"]
//!
//! [[package_mappings]]
//! from = "com.acme.legacy"
//! to = "com.acme.modern"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Root directory of the project being migrated
    pub project_root: PathBuf,
    /// Framework version to migrate to
    pub target_version: String,
    /// Report intended changes without writing anything
    pub dry_run: bool,
    /// Manifest path relative to the project root
    pub manifest: PathBuf,
    /// Expected framework parent coordinate
    pub framework: FrameworkCoordinate,
    /// Post-migration validation settings
    pub validation: ValidationConfig,
    /// Extra package mappings applied by the import remap phase
    pub package_mappings: Vec<PackageMappingConfig>,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or is not valid TOML.
    /// Semantic checks are left to [`MigrationConfig::validate`] so CLI
    /// overrides can be applied first.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// With project root
    #[inline]
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// With target version
    #[inline]
    #[must_use]
    pub fn with_target_version(mut self, version: impl Into<String>) -> Self {
        self.target_version = version.into();
        self
    }

    /// With dry-run mode
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// With validation enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation.enabled = enabled;
        self
    }

    /// With an extra package mapping
    #[inline]
    #[must_use]
    pub fn with_package_mapping(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.package_mappings.push(PackageMappingConfig {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Absolute manifest path
    #[inline]
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest)
    }

    /// Check semantic constraints
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_version.trim().is_empty() {
            return Err(ConfigError::invalid("target_version", "must not be empty"));
        }
        if self.framework.group_id.is_empty() || self.framework.artifact_id.is_empty() {
            return Err(ConfigError::invalid(
                "framework",
                "group_id and artifact_id are required",
            ));
        }
        for mapping in &self.package_mappings {
            if mapping.from.trim().is_empty() || mapping.to.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "package_mappings",
                    format!("empty prefix in mapping '{}' -> '{}'", mapping.from, mapping.to),
                ));
            }
        }
        if self.validation.enabled && self.validation.program.trim().is_empty() {
            return Err(ConfigError::invalid("validation.program", "must not be empty"));
        }
        Ok(())
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            target_version: String::new(),
            dry_run: false,
            manifest: PathBuf::from("pom.xml"),
            framework: FrameworkCoordinate::default(),
            validation: ValidationConfig::default(),
            package_mappings: Vec::new(),
        }
    }
}

/// Coordinate of the framework parent reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkCoordinate {
    /// Parent group id
    pub group_id: String,
    /// Parent artifact id
    pub artifact_id: String,
}

impl Default for FrameworkCoordinate {
    fn default() -> Self {
        Self {
            group_id: "org.springframework.boot".to_string(),
            artifact_id: "spring-boot-starter-parent".to_string(),
        }
    }
}

/// Post-migration validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Run the external build after migration
    pub enabled: bool,
    /// Build tool executable
    pub program: String,
    /// Arguments passed before every level's goal
    pub extra_args: Vec<String>,
    /// Levels to run, in order
    pub levels: Vec<ValidationLevelConfig>,
    /// Output markers that downgrade a passing build to a warning
    pub conflict_markers: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "mvn".to_string(),
            extra_args: vec!["-B".to_string()],
            levels: vec![ValidationLevelConfig::Compile],
            conflict_markers: vec![
                "omitted for conflict".to_string(),
                "Dependency convergence error".to_string(),
            ],
        }
    }
}

/// Validation level as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationLevelConfig {
    /// Compile sources
    Compile,
    /// Run the test suite
    Test,
    /// Resolve the dependency tree
    DependencyTree,
}

/// Extra (old prefix -> new prefix) mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMappingConfig {
    /// Old qualified-name prefix
    pub from: String,
    /// Replacement prefix
    pub to: String,
}
