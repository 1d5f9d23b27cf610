//! Stepwise Manifest
//!
//! Build manifest side of a migration step:
//! - [`ManifestModel`]: parent reference, dependencies, managed dependencies, plugins
//! - [`ManifestStore`]: reader/writer collaborator, with the lossless [`PomStore`]
//! - [`ManifestEditor`]: dependency helpers with dry-run aware bookkeeping
//! - [`ReleaseRules`]: per-release dependency and requirement hooks
//! - [`ManifestMigrator`]: the phase tying them together
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stepwise_core::{MigrationPhase, ReleaseBoundary};
//! use stepwise_manifest::{InMemoryManifestStore, ManifestMigrator};
//!
//! let pom = r#"<project>
//!   <parent>
//!     <groupId>org.springframework.boot</groupId>
//!     <artifactId>spring-boot-starter-parent</artifactId>
//!     <version>2.2.13.RELEASE</version>
//!   </parent>
//! </project>"#;
//! let store = Arc::new(InMemoryManifestStore::with_document("pom.xml", pom));
//! let phase = ManifestMigrator::new(
//!     store,
//!     "pom.xml",
//!     "2.3.12.RELEASE",
//!     Box::new(ReleaseBoundary::Boot2_3),
//! )
//! .with_dry_run(true);
//!
//! let result = phase.migrate().unwrap();
//! assert!(result.changes()[0].starts_with("Would update parent version"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod editor;
pub mod engine;
pub mod error;
pub mod model;
pub mod pom;
pub mod rules;

pub use editor::ManifestEditor;
pub use engine::ManifestMigrator;
pub use error::ManifestError;
pub use model::{DependencyDescriptor, ManifestModel, ParentReference, PluginDescriptor};
pub use pom::{parse_pom, render_pom, InMemoryManifestStore, ManifestStore, PomStore};
pub use rules::{Compatibility, CompatibilityRule, Detect, IntegrationCheck, ReleaseRules};
