//! Configuration key migration phase
//!
//! `.properties` files are rewritten key by key through
//! [`PropertiesDocument`]; YAML files are only inspected and every affected
//! key becomes a manual review item.

use std::path::Path;
use std::sync::Arc;

use stepwise_core::prelude::*;

use crate::document::{flatten_yaml, PropertiesDocument};
use crate::rules::{PropertyRemoval, PropertyRename};
use crate::store::{ConfigFileStore, ConfigFormat};

/// Property key migration phase
pub struct PropertyMigrator {
    store: Arc<dyn ConfigFileStore>,
    renames: Vec<PropertyRename>,
    removals: Vec<PropertyRemoval>,
    dry_run: bool,
}

impl std::fmt::Debug for PropertyMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyMigrator")
            .field("renames", &self.renames.len())
            .field("removals", &self.removals.len())
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl PropertyMigrator {
    /// Create phase, real mode
    #[must_use]
    pub fn new(
        store: Arc<dyn ConfigFileStore>,
        renames: Vec<PropertyRename>,
        removals: Vec<PropertyRemoval>,
    ) -> Self {
        Self {
            store,
            renames,
            removals,
            dry_run: false,
        }
    }

    /// With dry-run mode
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn removal_for(&self, key: &str) -> Option<&PropertyRemoval> {
        self.removals.iter().find(|r| r.key == key)
    }

    fn rename_for(&self, key: &str) -> Option<String> {
        self.renames.iter().find_map(|r| r.apply(key))
    }

    /// Apply renames to one document; returns the number of renamed keys
    pub fn migrate_document(
        &self,
        document: &mut PropertiesDocument,
        label: &str,
        result: &mut MigrationResult,
    ) -> usize {
        let mut keys: Vec<String> = Vec::new();
        for key in document.keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        let mut renamed = 0;

        for key in keys {
            if let Some(removal) = self.removal_for(&key) {
                result.add_ambiguity(
                    format!("{label}: {key} is no longer supported"),
                    format!("{label}: {}", removal.note),
                );
                continue;
            }
            let Some(new_key) = self.rename_for(&key) else {
                continue;
            };
            if document.contains_key(&new_key) {
                result.add_ambiguity(
                    format!("{label}: both {key} and {new_key} are set; {key} left in place"),
                    format!("{label}: merge {key} into {new_key}"),
                );
                continue;
            }
            let count = document.rename_key(&key, &new_key);
            if count > 0 {
                result.record(
                    self.dry_run,
                    ChangeAction::Rename,
                    format!("property in {label}: {key} -> {new_key}"),
                );
                renamed += count;
            }
        }
        renamed
    }

    fn review_yaml(&self, text: &str, path: &Path, label: &str, result: &mut MigrationResult) {
        let keys = match flatten_yaml(text, path) {
            Ok(keys) => keys,
            Err(err) => {
                result.add_error(format!("Cannot parse {label}: {err}"));
                return;
            }
        };

        let mut flagged = 0;
        for key in keys {
            if let Some(removal) = self.removal_for(&key) {
                result.add_manual_review_item(format!("{label}: remove {key} ({})", removal.note));
                flagged += 1;
            } else if let Some(new_key) = self.rename_for(&key) {
                result.add_manual_review_item(format!("{label}: rename {key} to {new_key}"));
                flagged += 1;
            }
        }
        if flagged > 0 {
            result.add_warning(format!(
                "{label}: {flagged} key(s) need manual migration; YAML files are not rewritten"
            ));
        }
    }

    fn migrate_properties(&self, text: &str, path: &Path, label: &str, result: &mut MigrationResult) {
        let mut document = PropertiesDocument::parse(text);
        let renamed = self.migrate_document(&mut document, label, result);
        if renamed == 0 {
            return;
        }
        result.mark_modified(label);
        if self.dry_run {
            return;
        }
        if let Err(err) = self.store.write(path, &document.render()) {
            tracing::error!("Write of {} failed: {}", label, err);
            result.add_error(format!(
                "Failed to write {label} after {renamed} change(s) were computed: {err}"
            ));
        }
    }
}

impl MigrationPhase for PropertyMigrator {
    fn name(&self) -> &str {
        "Configuration properties"
    }

    fn priority(&self) -> i32 {
        priority::PROPERTIES
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn migrate(&self) -> Result<MigrationResult, PhaseError> {
        let files = self.store.list()?;
        tracing::info!("Migrating {} configuration files", files.len());
        let mut result = MigrationResult::new();

        for path in &files {
            let label = path.display().to_string();
            let text = match self.store.read(path) {
                Ok(text) => text,
                Err(err) => {
                    result.add_error(format!("Cannot read {label}: {err}"));
                    continue;
                }
            };
            match ConfigFormat::detect(path) {
                Some(ConfigFormat::Properties) => {
                    self.migrate_properties(&text, path, &label, &mut result);
                }
                Some(ConfigFormat::Yaml) => self.review_yaml(&text, path, &label, &mut result),
                None => {}
            }
        }

        if result.is_empty() {
            result.add_change(if files.is_empty() {
                "No configuration files found; no migrations needed"
            } else {
                "No configuration keys need migration"
            });
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;
    use crate::store::InMemoryConfigFileStore;
    use stepwise_core::ReleaseBoundary;

    fn migrator(store: Arc<InMemoryConfigFileStore>, boundary: ReleaseBoundary) -> PropertyMigrator {
        PropertyMigrator::new(
            store,
            rules::renames(boundary).to_vec(),
            rules::removals(boundary).to_vec(),
        )
    }

    #[test]
    fn conflicting_target_key_is_ambiguity() {
        let mut doc = PropertiesDocument::parse(
            "spring.http.log-request-details=true\nspring.mvc.log-request-details=false\n",
        );
        let mut result = MigrationResult::new();
        let phase = migrator(Arc::new(InMemoryConfigFileStore::new()), ReleaseBoundary::Boot2_3);

        assert_eq!(phase.migrate_document(&mut doc, "app", &mut result), 0);
        assert_eq!(result.warnings().len(), 1);
        assert!(result.requires_manual_review());
    }

    #[test]
    fn removal_flags_review() {
        let store = Arc::new(InMemoryConfigFileStore::new());
        store.insert("application.properties", "spring.data.neo4j.use-native-types=true\n");
        let result = migrator(store.clone(), ReleaseBoundary::Boot2_4).migrate().unwrap();

        assert!(result.requires_manual_review());
        assert!(result.changes().is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn nothing_to_do() {
        let store = Arc::new(InMemoryConfigFileStore::new());
        let result = migrator(store.clone(), ReleaseBoundary::Boot2_3).migrate().unwrap();
        assert_eq!(result.changes(), ["No configuration files found; no migrations needed"]);

        store.insert("application.properties", "server.port=8080\n");
        let result = migrator(store, ReleaseBoundary::Boot2_3).migrate().unwrap();
        assert_eq!(result.changes(), ["No configuration keys need migration"]);
    }

    #[test]
    fn phase_contract() {
        let phase = migrator(Arc::new(InMemoryConfigFileStore::new()), ReleaseBoundary::Boot2_5)
            .with_dry_run(true);
        assert_eq!(phase.priority(), priority::PROPERTIES);
        assert!(phase.is_dry_run());
    }
}
