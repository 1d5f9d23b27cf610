//! Migration driver
//!
//! [`MigrationPipeline`] owns an ordered list of phases and an optional
//! validator. Phases run one at a time in ascending priority; a phase that
//! returns an error contributes an error entry to its own result and the
//! next phase still runs.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stepwise_core::{run_isolated, MigrationPhase, MigrationResult};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::validator::PostMigrationValidator;

/// Outcome of one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    /// Phase name
    pub name: String,
    /// Phase priority
    pub priority: i32,
    /// What the phase recorded
    pub result: MigrationResult,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    target_version: String,
    dry_run: bool,
    phases: Vec<PhaseReport>,
    validation: Option<MigrationResult>,
}

impl PipelineReport {
    /// Unique id of this run
    #[inline]
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the run started
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Requested framework version
    #[inline]
    #[must_use]
    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    /// Whether the run was a dry run
    #[inline]
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Per-phase outcomes in execution order
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    /// Validation outcome, `None` when validation is disabled
    #[inline]
    #[must_use]
    pub fn validation(&self) -> Option<&MigrationResult> {
        self.validation.as_ref()
    }

    /// Every phase result and the validation result merged in order
    #[must_use]
    pub fn merged(&self) -> MigrationResult {
        let mut merged = self
            .phases
            .iter()
            .fold(MigrationResult::new(), |acc, p| acc.merged(p.result.clone()));
        if let Some(validation) = &self.validation {
            merged.merge(validation.clone());
        }
        merged
    }

    /// Process exit code: 0 success, 1 any error, 2 manual review required
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        let merged = self.merged();
        if merged.has_errors() {
            1
        } else if merged.requires_manual_review() {
            2
        } else {
            0
        }
    }

    /// Serialize as pretty JSON
    ///
    /// # Errors
    /// [`PipelineError::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable report
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mode = if self.dry_run { "dry run" } else { "applied" };

        out.push_str("=== Stepwise Migration Report ===\n\n");
        let _ = writeln!(out, "Run: {}", self.run_id);
        let _ = writeln!(out, "Started: {}", self.started_at.to_rfc3339());
        let _ = writeln!(out, "Target: {} ({mode})", self.target_version);

        for phase in &self.phases {
            let _ = writeln!(out, "\n--- [{}] {} ---", phase.priority, phase.name);
            render_result(&mut out, &phase.result);
        }

        out.push_str("\n--- Validation ---\n");
        match &self.validation {
            Some(result) => render_result(&mut out, result),
            None => out.push_str("  disabled\n"),
        }

        let merged = self.merged();
        out.push_str("\n=== Summary ===\n");
        let _ = writeln!(out, "Changes: {}", merged.changes().len());
        let _ = writeln!(out, "Warnings: {}", merged.warnings().len());
        let _ = writeln!(out, "Errors: {}", merged.errors().len());
        let _ = writeln!(out, "Modified units: {}", merged.modified_units().len());
        if merged.requires_manual_review() {
            let _ = writeln!(
                out,
                "Manual review: REQUIRED ({} item(s))",
                merged.manual_review_items().len()
            );
        } else {
            out.push_str("Manual review: not required\n");
        }
        let status = match self.exit_code() {
            0 => "SUCCESS",
            2 => "REVIEW REQUIRED",
            _ => "FAILED",
        };
        let _ = writeln!(out, "Status: {status}");
        out
    }
}

fn render_result(out: &mut String, result: &MigrationResult) {
    for change in result.changes() {
        let _ = writeln!(out, "  + {change}");
    }
    for warning in result.warnings() {
        let _ = writeln!(out, "  ! {warning}");
    }
    for error in result.errors() {
        let _ = writeln!(out, "  x {error}");
    }
    for unit in result.modified_units() {
        let _ = writeln!(out, "  modified: {unit}");
    }
    for item in result.manual_review_items() {
        let _ = writeln!(out, "  review: {item}");
    }
}

/// Ordered set of phases plus post-migration validation
pub struct MigrationPipeline {
    target_version: String,
    dry_run: bool,
    phases: Vec<Box<dyn MigrationPhase>>,
    validator: Option<PostMigrationValidator>,
}

impl std::fmt::Debug for MigrationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationPipeline")
            .field("target_version", &self.target_version)
            .field("dry_run", &self.dry_run)
            .field("phases", &self.phase_names())
            .field("validator", &self.validator)
            .finish()
    }
}

impl MigrationPipeline {
    /// Empty pipeline for a target version, real mode, no validation
    #[must_use]
    pub fn new(target_version: impl Into<String>) -> Self {
        Self {
            target_version: target_version.into(),
            dry_run: false,
            phases: Vec::new(),
            validator: None,
        }
    }

    /// With dry-run mode; validation is skipped in dry run
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Add a phase; phases stay sorted by ascending priority, ties in
    /// insertion order
    #[must_use]
    pub fn with_phase(mut self, phase: Box<dyn MigrationPhase>) -> Self {
        self.phases.push(phase);
        stepwise_core::sort_by_priority(&mut self.phases);
        self
    }

    /// With post-migration validation
    #[inline]
    #[must_use]
    pub fn with_validator(mut self, validator: PostMigrationValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Phase names in execution order
    #[must_use]
    pub fn phase_names(&self) -> Vec<&str> {
        self.phases.iter().map(|p| p.name()).collect()
    }

    /// Run every phase, then validation
    #[must_use]
    pub fn run(&self) -> PipelineReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(
            "Starting run {} to {} with {} phase(s){}",
            run_id,
            self.target_version,
            self.phases.len(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let phases = self
            .phases
            .iter()
            .map(|phase| {
                let span =
                    tracing::info_span!("phase", name = phase.name(), priority = phase.priority());
                let _guard = span.enter();
                let result = run_isolated(phase.as_ref());
                tracing::info!(
                    "Finished: {} change(s), {} warning(s), {} error(s)",
                    result.changes().len(),
                    result.warnings().len(),
                    result.errors().len()
                );
                PhaseReport {
                    name: phase.name().to_string(),
                    priority: phase.priority(),
                    result,
                }
            })
            .collect();

        let validation = self.validator.as_ref().map(|validator| {
            let _guard = tracing::info_span!("validation").entered();
            if self.dry_run {
                tracing::info!("Skipping validation in dry run");
                let mut skipped = MigrationResult::new();
                skipped.add_change("Validation skipped: dry run");
                skipped
            } else {
                validator.validate()
            }
        });

        PipelineReport {
            run_id,
            started_at,
            target_version: self.target_version.clone(),
            dry_run: self.dry_run,
            phases,
            validation,
        }
    }
}
