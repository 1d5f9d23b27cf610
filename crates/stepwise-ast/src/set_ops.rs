//! Set-operation call merging
//!
//! Calls such as `ops.union(key, otherKeys)` lose their two-argument form;
//! the pair is merged into one collection expression. After each rewrite the
//! tree is queried again and the remaining match with the greatest start
//! offset is rewritten next, so nested calls are handled before the calls
//! that contain them.

use std::sync::Arc;

use stepwise_core::prelude::*;

use crate::error::SourceError;
use crate::store::{SourceSet, SourceStore};
use crate::unit::{MethodCall, SourceUnit};

/// How two arguments are merged into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// `Stream.concat(Stream.of(a), b.stream()).collect(Collectors.toList())`
    #[default]
    ConcatSingleton,
}

impl MergeStrategy {
    /// Synthesize the single-argument expression
    #[must_use]
    pub fn merge(&self, first: &str, second: &str) -> String {
        match self {
            MergeStrategy::ConcatSingleton => format!(
                "Stream.concat(Stream.of({first}), {}.stream()).collect(Collectors.toList())",
                parenthesize(second)
            ),
        }
    }

    /// Imports the synthesized expression relies on
    #[must_use]
    pub fn required_imports(&self) -> &'static [&'static str] {
        match self {
            MergeStrategy::ConcatSingleton => &["java.util.stream.Stream", "java.util.stream.Collectors"],
        }
    }
}

/// Wrap an expression unless it is safe as a method receiver
fn parenthesize(expr: &str) -> String {
    let simple = expr
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '(' | ')'));
    if simple && !expr.starts_with('(') {
        expr.to_string()
    } else {
        format!("({expr})")
    }
}

/// Call family identified by name and exact argument count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperationRule {
    /// Method name
    pub method: String,
    /// Argument count the rule applies to
    pub arity: usize,
    /// Rewrite strategy
    pub strategy: MergeStrategy,
}

impl SetOperationRule {
    /// Two-argument rule with the default strategy
    #[must_use]
    pub fn binary(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arity: 2,
            strategy: MergeStrategy::default(),
        }
    }

    /// Whether `call` belongs to this family
    #[inline]
    #[must_use]
    pub fn matches(&self, call: &MethodCall) -> bool {
        call.method == self.method && call.arguments.len() == self.arity
    }
}

/// Set-operation rewrite phase
pub struct SetOperationMigrator {
    store: Arc<dyn SourceStore>,
    rules: Vec<SetOperationRule>,
    dry_run: bool,
}

impl std::fmt::Debug for SetOperationMigrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetOperationMigrator")
            .field("rules", &self.rules)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl SetOperationMigrator {
    /// Create phase, real mode
    #[must_use]
    pub fn new(store: Arc<dyn SourceStore>, rules: Vec<SetOperationRule>) -> Self {
        Self {
            store,
            rules,
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

    /// Configured rules
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[SetOperationRule] {
        &self.rules
    }

    fn matching(&self, unit: &SourceUnit) -> Vec<(MethodCall, MergeStrategy)> {
        unit.method_calls()
            .into_iter()
            .filter_map(|call| {
                let rule = self.rules.iter().find(|r| r.matches(&call))?;
                Some((call, rule.strategy))
            })
            .collect()
    }

    /// Rewrite every matching call of one unit; returns the number rewritten
    ///
    /// # Errors
    /// The first rejected splice. `unit` may be partially edited then, so
    /// callers work on a copy.
    pub fn rewrite_unit(
        &self,
        unit: &mut SourceUnit,
        result: &mut MigrationResult,
    ) -> Result<usize, SourceError> {
        let name = unit.name().to_string();
        let initial = self.matching(unit).len();
        let mut rewritten = 0;
        let mut strategies: Vec<MergeStrategy> = Vec::new();

        while rewritten < initial {
            let Some((call, strategy)) = self
                .matching(unit)
                .into_iter()
                .max_by_key(|(call, _)| call.span.start)
            else {
                break;
            };
            let merged = strategy.merge(&call.arguments[0], &call.arguments[1]);
            unit.splice(call.arguments_span.clone(), &format!("({merged})"))?;
            result.record(
                self.dry_run,
                ChangeAction::Rewrite,
                format!("{}() call in {name}: 2 arguments merged into one", call.method),
            );
            if !strategies.contains(&strategy) {
                strategies.push(strategy);
            }
            rewritten += 1;
        }

        for strategy in strategies {
            for import in strategy.required_imports() {
                if unit.add_import(import)? {
                    result.record(self.dry_run, ChangeAction::Add, format!("import {import} to {name}"));
                }
            }
        }
        Ok(rewritten)
    }
}

impl MigrationPhase for SetOperationMigrator {
    fn name(&self) -> &str {
        "Set-operation call merging"
    }

    fn priority(&self) -> i32 {
        priority::CALL_REWRITE
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn migrate(&self) -> Result<MigrationResult, PhaseError> {
        let units = self.store.load_all()?;
        tracing::info!("Scanning {} units for set-operation calls", units.len());

        let mut result = MigrationResult::new();
        let mut modified = SourceSet::new();
        let mut total = 0;

        for (name, unit) in &units {
            let mut working = unit.clone();
            let mut local = MigrationResult::new();
            match self.rewrite_unit(&mut working, &mut local) {
                Ok(0) => {}
                Ok(count) => {
                    tracing::debug!("{}: {} calls rewritten", name, count);
                    total += count;
                    result.merge(local);
                    result.mark_modified(name.clone());
                    modified.insert(name.clone(), working);
                }
                Err(err) => {
                    tracing::warn!("Call rewrite of {} rolled back: {}", name, err);
                    result.add_ambiguity(
                        format!("Set-operation calls in {name} left unchanged: {err}"),
                        format!("Merge the set-operation arguments in {name} by hand"),
                    );
                }
            }
        }

        if total == 0 {
            if !result.requires_manual_review() {
                result.add_change("No set-operation calls found; no migrations needed");
            }
            return Ok(result);
        }

        // Argument side effects and element types are not analysed, so every
        // rewrite is escalated, literal-only merges included
        result.add_manual_review_item(format!(
            "{total} set-operation call site(s) rewritten to a single collection argument; \
             verify their runtime behavior independently"
        ));

        if !self.dry_run {
            if let Err(err) = self.store.write_back(&modified) {
                tracing::error!("Source write-back failed: {}", err);
                result.add_error(format!(
                    "Failed to write {} unit(s) after {} change(s) were computed: {err}",
                    modified.len(),
                    result.changes().len()
                ));
            }
        }
        Ok(result)
    }
}
