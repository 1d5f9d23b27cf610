//! Phase contract shared by every migration step
//!
//! Implement [`MigrationPhase`] to add a new step to the pipeline. A phase is
//! stateless between invocations; everything it reads or writes comes from the
//! collaborators it was constructed with.
//!
//! # Dry-run contract
//!
//! When [`MigrationPhase::is_dry_run`] is true the phase must not mutate any
//! artifact nor call any write collaborator. Every would-be mutation is
//! recorded with [`MigrationResult::record`], which words it hypothetically.

use crate::error::PhaseError;
use crate::result::MigrationResult;

/// Well-known phase priorities (lower runs first)
pub mod priority {
    /// Build manifest rules
    pub const MANIFEST: i32 = 10;
    /// Configuration key/value files
    pub const PROPERTIES: i32 = 20;
    /// Import and qualified-name remapping
    pub const IMPORT_REMAP: i32 = 30;
    /// Method-call signature merging
    pub const CALL_REWRITE: i32 = 40;
}

/// A discrete, independently ordered migration step
pub trait MigrationPhase: Send + Sync {
    /// Human-readable phase name
    fn name(&self) -> &str;

    /// Execution priority (lower = earlier)
    fn priority(&self) -> i32;

    /// Whether this phase only reports intended mutations
    fn is_dry_run(&self) -> bool;

    /// Run the phase
    ///
    /// # Errors
    /// Returns [`PhaseError`] on failures the phase cannot record itself; the
    /// driver turns it into an error entry and continues with the next phase.
    fn migrate(&self) -> Result<MigrationResult, PhaseError>;
}

impl std::fmt::Debug for dyn MigrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationPhase")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .field("dry_run", &self.is_dry_run())
            .finish()
    }
}

/// Sort phases by ascending priority, keeping insertion order for ties
pub fn sort_by_priority(phases: &mut [Box<dyn MigrationPhase>]) {
    phases.sort_by_key(|p| p.priority());
}

/// Run one phase, converting a returned error into an error entry
///
/// This is the isolation boundary: whatever happens inside a phase ends up
/// in its own result.
#[must_use]
pub fn run_isolated(phase: &dyn MigrationPhase) -> MigrationResult {
    match phase.migrate() {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Phase '{}' failed: {}", phase.name(), e);
            MigrationResult::from_error(format!("Phase '{}' failed: {}", phase.name(), e))
        }
    }
}
