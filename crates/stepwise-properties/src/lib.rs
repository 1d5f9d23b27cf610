//! Stepwise Properties
//!
//! Migration of `application*.properties` and `application*.yml` keys:
//! - [`PropertiesDocument`]: lossless `.properties` model
//! - [`ConfigFileStore`]: list/read/write collaborator
//! - [`PropertyMigrator`]: the phase
//! - [`rules`]: rename and removal tables per release boundary

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod engine;
pub mod error;
pub mod rules;
pub mod store;

pub use document::{flatten_yaml, PropertiesDocument};
pub use engine::PropertyMigrator;
pub use error::ConfigFileError;
pub use rules::{PropertyRemoval, PropertyRename};
pub use store::{ConfigFileStore, ConfigFormat, FsConfigFileStore, InMemoryConfigFileStore};
