//! Result aggregation for a single migration phase
//!
//! A [`MigrationResult`] is created empty when a phase starts, filled while the
//! phase runs and handed to the driver when `migrate()` returns. Every
//! structural decision a phase makes (skip, transform, flag for review) must be
//! traceable to one of its entries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Kind of mutation described by a change entry
///
/// Rendered in past tense for real runs and in hypothetical form for dry runs,
/// so the two kinds of report can never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// A value was replaced in place
    Update,
    /// A new element was appended
    Add,
    /// An element was deleted
    Remove,
    /// A key or name was changed
    Rename,
    /// A syntax node was rewritten
    Rewrite,
}

impl ChangeAction {
    /// Verb used in real (non-dry-run) reports
    #[inline]
    #[must_use]
    pub fn past(&self) -> &'static str {
        match self {
            ChangeAction::Update => "Updated",
            ChangeAction::Add => "Added",
            ChangeAction::Remove => "Removed",
            ChangeAction::Rename => "Renamed",
            ChangeAction::Rewrite => "Rewrote",
        }
    }

    /// Verb used in dry-run reports
    #[inline]
    #[must_use]
    pub fn hypothetical(&self) -> &'static str {
        match self {
            ChangeAction::Update => "Would update",
            ChangeAction::Add => "Would add",
            ChangeAction::Remove => "Would remove",
            ChangeAction::Rename => "Would rename",
            ChangeAction::Rewrite => "Would rewrite",
        }
    }

    /// Render a change line for the given mode
    #[inline]
    #[must_use]
    pub fn describe(&self, dry_run: bool, detail: &str) -> String {
        let verb = if dry_run {
            self.hypothetical()
        } else {
            self.past()
        };
        format!("{verb} {detail}")
    }
}

/// Outcome of one phase execution
///
/// All sequences are append-only. Once [`requires_manual_review`] is set it
/// stays set for the lifetime of the value.
///
/// [`requires_manual_review`]: MigrationResult::requires_manual_review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationResult {
    changes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    modified_units: BTreeSet<String>,
    requires_manual_review: bool,
    manual_review_items: Vec<String>,
}

impl MigrationResult {
    /// Create empty result
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result holding a single error entry
    #[must_use]
    pub fn from_error(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.add_error(message);
        result
    }

    /// Append an informational change entry
    #[inline]
    pub fn add_change(&mut self, change: impl Into<String>) {
        self.changes.push(change.into());
    }

    /// Append a mutation entry worded for the current mode
    ///
    /// `detail` completes the sentence started by the action verb, e.g.
    /// `"parent version: 2.2.13.RELEASE -> 2.3.12.RELEASE"`.
    #[inline]
    pub fn record(&mut self, dry_run: bool, action: ChangeAction, detail: impl AsRef<str>) {
        self.changes.push(action.describe(dry_run, detail.as_ref()));
    }

    /// Append a warning entry
    #[inline]
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Append an error entry
    #[inline]
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Mark a unit (type name, file path) as modified
    #[inline]
    pub fn mark_modified(&mut self, unit: impl Into<String>) {
        self.modified_units.insert(unit.into());
    }

    /// Flag the result for manual review
    #[inline]
    pub fn flag_manual_review(&mut self) {
        self.requires_manual_review = true;
    }

    /// Append a manual review item and flag the result
    #[inline]
    pub fn add_manual_review_item(&mut self, item: impl Into<String>) {
        self.requires_manual_review = true;
        self.manual_review_items.push(item.into());
    }

    /// Report an ambiguous transformation
    ///
    /// Ambiguity is never an error: it surfaces as a warning plus a review item.
    pub fn add_ambiguity(&mut self, warning: impl Into<String>, review_item: impl Into<String>) {
        self.add_warning(warning);
        self.add_manual_review_item(review_item);
    }

    /// Merge another result into this one
    ///
    /// Sequences are concatenated in order and the review flag is OR-ed.
    pub fn merge(&mut self, other: MigrationResult) {
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        self.modified_units.extend(other.modified_units);
        self.requires_manual_review |= other.requires_manual_review;
        self.manual_review_items.extend(other.manual_review_items);
    }

    /// Merge two results into a new one
    #[must_use]
    pub fn merged(mut self, other: MigrationResult) -> Self {
        self.merge(other);
        self
    }

    /// Change entries
    #[inline]
    #[must_use]
    pub fn changes(&self) -> &[String] {
        &self.changes
    }

    /// Warning entries
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Error entries
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Identifiers of modified units
    #[inline]
    #[must_use]
    pub fn modified_units(&self) -> &BTreeSet<String> {
        &self.modified_units
    }

    /// Whether a human must review the outcome
    #[inline]
    #[must_use]
    pub fn requires_manual_review(&self) -> bool {
        self.requires_manual_review
    }

    /// Manual review action items
    #[inline]
    #[must_use]
    pub fn manual_review_items(&self) -> &[String] {
        &self.manual_review_items
    }

    /// Check if any error was recorded
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the result is successful (no errors)
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if nothing at all was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
            && self.warnings.is_empty()
            && self.errors.is_empty()
            && self.modified_units.is_empty()
            && !self.requires_manual_review
            && self.manual_review_items.is_empty()
    }
}
