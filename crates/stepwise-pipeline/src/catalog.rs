//! Pipeline assembly from configuration
//!
//! Picks the release boundary for the configured target version and wires
//! the on-disk collaborators into the phases that boundary needs. Phases
//! whose rule tables are empty for the boundary are left out.

use std::sync::Arc;

use stepwise_ast::{presets, FsSourceStore, ImportRemapMigrator, PackageMapping, SetOperationMigrator};
use stepwise_core::{MigrationConfig, MigrationPhase, ReleaseBoundary};
use stepwise_manifest::{ManifestMigrator, PomStore};
use stepwise_properties::{rules, FsConfigFileStore, PropertyMigrator};

use crate::error::PipelineError;
use crate::pipeline::MigrationPipeline;
use crate::validator::{CommandRunner, PostMigrationValidator, ProcessRunner};

/// Release boundary for the configured target version
///
/// # Errors
/// [`PipelineError::UnsupportedTarget`] if no boundary upgrades to it.
pub fn boundary_for(config: &MigrationConfig) -> Result<ReleaseBoundary, PipelineError> {
    ReleaseBoundary::for_target(&config.target_version)
        .ok_or_else(|| PipelineError::UnsupportedTarget(config.target_version.clone()))
}

/// Built-in package mappings of the boundary followed by the configured ones
#[must_use]
pub fn package_mappings(config: &MigrationConfig, boundary: ReleaseBoundary) -> Vec<PackageMapping> {
    let mut mappings = presets::package_mappings(boundary);
    mappings.extend(
        config
            .package_mappings
            .iter()
            .map(|m| PackageMapping::new(m.from.clone(), m.to.clone())),
    );
    mappings
}

/// Phases for one boundary, unsorted
#[must_use]
pub fn phases_for(config: &MigrationConfig, boundary: ReleaseBoundary) -> Vec<Box<dyn MigrationPhase>> {
    let dry_run = config.dry_run;
    let root = &config.project_root;
    let mut phases: Vec<Box<dyn MigrationPhase>> = Vec::new();

    phases.push(Box::new(
        ManifestMigrator::new(
            Arc::new(PomStore::new()),
            config.manifest_path(),
            config.target_version.clone(),
            Box::new(boundary),
        )
        .with_framework(config.framework.clone())
        .with_dry_run(dry_run),
    ));

    phases.push(Box::new(
        PropertyMigrator::new(
            Arc::new(FsConfigFileStore::new(root.clone())),
            rules::renames(boundary).to_vec(),
            rules::removals(boundary).to_vec(),
        )
        .with_dry_run(dry_run),
    ));

    let sources = Arc::new(FsSourceStore::new(root.clone()));

    let mappings = package_mappings(config, boundary);
    if mappings.is_empty() {
        tracing::debug!("No package mappings for {}; import remapping not scheduled", boundary);
    } else {
        phases.push(Box::new(
            ImportRemapMigrator::new(sources.clone(), mappings)
                .with_guide(presets::review_guide(boundary))
                .with_dry_run(dry_run),
        ));
    }

    let set_rules = presets::set_operation_rules(boundary);
    if set_rules.is_empty() {
        tracing::debug!("No set-operation rules for {}; call merging not scheduled", boundary);
    } else {
        phases.push(Box::new(
            SetOperationMigrator::new(sources, set_rules).with_dry_run(dry_run),
        ));
    }

    phases
}

/// Pipeline for a validated configuration, running validation through `runner`
///
/// # Errors
/// [`PipelineError::Config`] if the configuration is invalid,
/// [`PipelineError::UnsupportedTarget`] if the target version has no boundary.
pub fn build_pipeline_with(
    config: &MigrationConfig,
    runner: Arc<dyn CommandRunner>,
) -> Result<MigrationPipeline, PipelineError> {
    config.validate()?;
    let boundary = boundary_for(config)?;
    tracing::info!("Release boundary {} selected for {}", boundary, config.target_version);

    let mut pipeline = MigrationPipeline::new(config.target_version.clone()).with_dry_run(config.dry_run);
    for phase in phases_for(config, boundary) {
        pipeline = pipeline.with_phase(phase);
    }
    if config.validation.enabled {
        pipeline = pipeline.with_validator(PostMigrationValidator::from_config(
            runner,
            config.project_root.clone(),
            &config.validation,
        ));
    }
    Ok(pipeline)
}

/// Pipeline running validation as real processes
///
/// # Errors
/// See [`build_pipeline_with`].
pub fn build_pipeline(config: &MigrationConfig) -> Result<MigrationPipeline, PipelineError> {
    build_pipeline_with(config, Arc::new(ProcessRunner))
}
