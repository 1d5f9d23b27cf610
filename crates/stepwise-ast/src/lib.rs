//! Stepwise AST
//!
//! Source rewrite engine over Java syntax trees:
//! - [`SourceUnit`]: owned text plus tree-sitter tree; every edit is validated
//! - [`SourceStore`]: loader/writer collaborator ([`FsSourceStore`], [`InMemorySourceStore`])
//! - [`ImportRemapMigrator`]: qualified-name prefix remapping
//! - [`SetOperationMigrator`]: two-argument set-operation calls merged into one argument
//! - [`presets`]: built-in tables per release boundary
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use stepwise_ast::{ImportRemapMigrator, InMemorySourceStore, PackageMapping};
//! use stepwise_core::MigrationPhase;
//!
//! let store = Arc::new(InMemorySourceStore::new());
//! store.add_source("Repo", "import a.b.Cluster;\nclass Repo {}\n").unwrap();
//!
//! let phase = ImportRemapMigrator::new(store.clone(), vec![PackageMapping::new("a.b", "x.y")]);
//! let result = phase.migrate().unwrap();
//!
//! assert!(result.requires_manual_review());
//! assert_eq!(store.text_of("Repo").unwrap(), "import x.y.Cluster;\nclass Repo {}\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod imports;
pub mod presets;
pub mod set_ops;
pub mod store;
pub mod unit;

pub use error::SourceError;
pub use imports::{remap, ImportRemapMigrator, ManualPattern, PackageMapping, ReviewGuide};
pub use set_ops::{MergeStrategy, SetOperationMigrator, SetOperationRule};
pub use store::{FsSourceStore, InMemorySourceStore, SourceSet, SourceStore, DEFAULT_SOURCE_DIRS};
pub use unit::{ImportDecl, MethodCall, QualifiedName, SourceUnit};
