//! Import and qualified-name remapping
//!
//! For every import whose name equals an old prefix or continues it with a
//! `.`, the prefix is substituted in place (so `static` and `.*` survive).
//! When the mapped import already exists the old declaration is dropped
//! instead. Dotted type names in the body are remapped the same way.
//!
//! Each unit is transformed on a private copy; a rejected edit discards the
//! whole unit and is reported as an ambiguity, never half-applied.

use std::sync::Arc;

use stepwise_core::prelude::*;

use crate::error::SourceError;
use crate::store::{SourceSet, SourceStore};
use crate::unit::SourceUnit;

/// Old-prefix -> new-prefix pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageMapping {
    /// Prefix being replaced
    pub old_prefix: String,
    /// Replacement prefix
    pub new_prefix: String,
}

impl PackageMapping {
    /// Create mapping
    #[inline]
    #[must_use]
    pub fn new(old_prefix: impl Into<String>, new_prefix: impl Into<String>) -> Self {
        Self {
            old_prefix: old_prefix.into(),
            new_prefix: new_prefix.into(),
        }
    }

    /// Whether `name` is the prefix itself or lies below it
    #[inline]
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.strip_prefix(self.old_prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }

    /// Mapped name, if this mapping applies
    #[must_use]
    pub fn apply(&self, name: &str) -> Option<String> {
        self.matches(name)
            .then(|| format!("{}{}", self.new_prefix, &name[self.old_prefix.len()..]))
    }
}

/// Mapping with the longest matching old prefix
#[must_use]
pub fn remap<'m>(mappings: &'m [PackageMapping], name: &str) -> Option<(&'m PackageMapping, String)> {
    mappings
        .iter()
        .filter(|m| m.matches(name))
        .max_by_key(|m| m.old_prefix.len())
        .and_then(|m| m.apply(name).map(|mapped| (m, mapped)))
}

/// Call-site pattern the automatic pass cannot rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualPattern {
    /// What changed
    pub title: String,
    /// Code before the upgrade
    pub before: String,
    /// Equivalent code after the upgrade
    pub after: String,
}

impl ManualPattern {
    /// Create pattern
    #[must_use]
    pub fn new(title: impl Into<String>, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            before: before.into(),
            after: after.into(),
        }
    }

    fn render(&self) -> String {
        format!(
            "{}\n  Before: {}\n  After:  {}",
            self.title, self.before, self.after
        )
    }
}

/// Guidance appended when at least one unit was remapped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewGuide {
    /// Topic, e.g. the library being upgraded
    pub topic: String,
    /// Patterns left for a human
    pub manual_patterns: Vec<ManualPattern>,
}

impl ReviewGuide {
    /// Create guide
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            manual_patterns: Vec::new(),
        }
    }

    /// With a manual pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: ManualPattern) -> Self {
        self.manual_patterns.push(pattern);
        self
    }

    /// Review items: one for the automatic part, one per manual pattern
    #[must_use]
    pub fn items(&self, mappings: &[PackageMapping], units: &[String]) -> Vec<String> {
        let remapped = mappings
            .iter()
            .map(|m| format!("{} -> {}", m.old_prefix, m.new_prefix))
            .collect::<Vec<_>>()
            .join(", ");
        let mut items = vec![format!(
            "[{}] Automatic: imports remapped ({remapped}) in {} unit(s): {}",
            self.topic,
            units.len(),
            units.join(", ")
        )];
        items.extend(
            self.manual_patterns
                .iter()
                .enumerate()
                .map(|(i, p)| format!("[{}] Manual {}: {}", self.topic, i + 1, p.render())),
        );
        items
    }
}

/// Import remapping phase
pub struct ImportRemapMigrator {
    store: Arc<dyn SourceStore>,
    mappings: Vec<PackageMapping>,
    guide: ReviewGuide,
    dry_run: bool,
}

impl std::fmt::Debug for ImportRemapMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportRemapMigrator")
            .field("mappings", &self.mappings)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ImportRemapMigrator {
    /// Create phase, real mode
    #[must_use]
    pub fn new(store: Arc<dyn SourceStore>, mappings: Vec<PackageMapping>) -> Self {
        Self {
            store,
            mappings,
            guide: ReviewGuide::new("Imports"),
            dry_run: false,
        }
    }

    /// With review guide
    #[inline]
    #[must_use]
    pub fn with_guide(mut self, guide: ReviewGuide) -> Self {
        self.guide = guide;
        self
    }

    /// With dry-run mode
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Configured mappings
    #[inline]
    #[must_use]
    pub fn mappings(&self) -> &[PackageMapping] {
        &self.mappings
    }

    /// Remap one unit in place; returns the number of edits
    ///
    /// # Errors
    /// The first rejected splice. `unit` may be partially edited then, so
    /// callers work on a copy.
    pub fn remap_unit(
        &self,
        unit: &mut SourceUnit,
        result: &mut MigrationResult,
    ) -> Result<usize, SourceError> {
        let name = unit.name().to_string();
        let mut edits = 0;

        // Qualified names in the body sit after every import, so they go first
        let mut qualified = unit.qualified_type_names();
        qualified.sort_by_key(|q| std::cmp::Reverse(q.span.start));
        for q in qualified {
            let Some((_, mapped)) = remap(&self.mappings, &q.text) else {
                continue;
            };
            unit.splice(q.span.clone(), &mapped)?;
            result.record(
                self.dry_run,
                ChangeAction::Rename,
                format!("qualified name in {name}: {} -> {mapped}", q.text),
            );
            edits += 1;
        }

        let mut imports = unit.imports();
        imports.sort_by_key(|d| std::cmp::Reverse(d.span.start));
        for decl in imports {
            let Some((_, mapped)) = remap(&self.mappings, &decl.name) else {
                continue;
            };
            let duplicate = unit.imports().iter().any(|d| {
                d.name == mapped && d.is_static == decl.is_static && d.is_wildcard == decl.is_wildcard
            });
            if duplicate {
                unit.remove_import(&decl)?;
                result.record(
                    self.dry_run,
                    ChangeAction::Remove,
                    format!("import in {name}: {} (already imported as {mapped})", decl.name),
                );
            } else {
                unit.splice(decl.name_span.clone(), &mapped)?;
                result.record(
                    self.dry_run,
                    ChangeAction::Rename,
                    format!("import in {name}: {} -> {mapped}", decl.name),
                );
            }
            edits += 1;
        }
        Ok(edits)
    }

    fn write(&self, modified: &SourceSet, result: &mut MigrationResult) {
        if let Err(err) = self.store.write_back(modified) {
            tracing::error!("Source write-back failed: {}", err);
            result.add_error(format!(
                "Failed to write {} unit(s) after {} change(s) were computed: {err}",
                modified.len(),
                result.changes().len()
            ));
        }
    }
}

impl MigrationPhase for ImportRemapMigrator {
    fn name(&self) -> &str {
        "Import remapping"
    }

    fn priority(&self) -> i32 {
        priority::IMPORT_REMAP
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn migrate(&self) -> Result<MigrationResult, PhaseError> {
        let units = self.store.load_all()?;
        tracing::info!(
            "Remapping imports in {} units with {} mappings",
            units.len(),
            self.mappings.len()
        );

        let mut result = MigrationResult::new();
        let mut modified = SourceSet::new();

        for (name, unit) in &units {
            let mut working = unit.clone();
            let mut local = MigrationResult::new();
            match self.remap_unit(&mut working, &mut local) {
                Ok(0) => {}
                Ok(edits) => {
                    tracing::debug!("{}: {} import edits", name, edits);
                    result.merge(local);
                    result.mark_modified(name.clone());
                    modified.insert(name.clone(), working);
                }
                Err(err) => {
                    tracing::warn!("Import remap of {} rolled back: {}", name, err);
                    result.add_ambiguity(
                        format!("Imports of {name} left unchanged: {err}"),
                        format!("Update imports of {name} by hand"),
                    );
                }
            }
        }

        if modified.is_empty() {
            if !result.requires_manual_review() {
                result.add_change("No imports matched the package mappings; no migrations needed");
            }
            return Ok(result);
        }

        let names: Vec<String> = modified.keys().cloned().collect();
        for item in self.guide.items(&self.mappings, &names) {
            result.add_manual_review_item(item);
        }

        if !self.dry_run {
            self.write(&modified, &mut result);
        }
        Ok(result)
    }
}
