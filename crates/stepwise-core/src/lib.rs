//! Stepwise Core
//!
//! Shared foundation for every migration step:
//! - [`MigrationResult`]: append-only record of changes, warnings, errors and
//!   manual review items produced by one phase
//! - [`MigrationPhase`]: the execution contract (name, priority, dry-run, migrate)
//! - [`Version`]: total ordering over dotted/qualified version strings
//! - [`ReleaseBoundary`]: the upgrade step every rule table is keyed by
//! - [`MigrationConfig`]: `stepwise.toml` model
//!
//! # Example
//!
//! ```rust
//! use stepwise_core::{ChangeAction, MigrationResult};
//!
//! let mut result = MigrationResult::new();
//! result.record(true, ChangeAction::Update, "parent version: 2.2.13.RELEASE -> 2.3.12.RELEASE");
//! assert_eq!(
//!     result.changes()[0],
//!     "Would update parent version: 2.2.13.RELEASE -> 2.3.12.RELEASE"
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod phase;
pub mod release;
pub mod result;
pub mod version;

// Re-exports for convenience
pub use config::{
    FrameworkCoordinate, MigrationConfig, PackageMappingConfig, ValidationConfig,
    ValidationLevelConfig,
};
pub use error::{ConfigError, PhaseError};
pub use phase::{priority, run_isolated, sort_by_priority, MigrationPhase};
pub use release::ReleaseBoundary;
pub use result::{ChangeAction, MigrationResult};
pub use version::{compare_versions, is_at_least, major_minor_prefix, same_minor_line, Version};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for implementing phases
    pub use crate::error::PhaseError;
    pub use crate::phase::{priority, MigrationPhase};
    pub use crate::result::{ChangeAction, MigrationResult};
}
