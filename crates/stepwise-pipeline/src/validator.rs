//! Post-migration validation
//!
//! Runs the project's build tool once per [`ValidationLevel`] in the project
//! root and classifies each run:
//! - exit code zero: pass (a change entry)
//! - exit code zero with a conflict marker in the output: warning
//! - non-zero exit or no exit code: error carrying the exit code and the
//!   captured output verbatim; later levels are not run
//!
//! Every invocation blocks until the process exits. There is no timeout.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use stepwise_core::{MigrationResult, PhaseError, ValidationConfig, ValidationLevelConfig};

use crate::error::CommandError;

/// Exit status and combined stdout/stderr of one process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Stdout followed by stderr
    pub output: String,
}

impl CommandOutput {
    /// Whether the process exited with code zero
    #[inline]
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// External build invocation collaborator
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd` and wait for it to exit
    ///
    /// # Errors
    /// [`CommandError::Spawn`] if the process cannot be started. A process that
    /// starts and fails is an `Ok` with a non-zero exit code.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput, CommandError>;
}

/// Runs commands with [`std::process::Command`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput, CommandError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| CommandError::spawn(program, e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandOutput {
            exit_code: output.status.code(),
            output: combined,
        })
    }
}

/// One validation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationLevel {
    /// Compile main and test sources
    Compile,
    /// Run the test suite
    Test,
    /// Resolve the full dependency tree
    DependencyTree,
}

impl ValidationLevel {
    /// Build tool goal
    #[inline]
    #[must_use]
    pub fn goal(&self) -> &'static str {
        match self {
            ValidationLevel::Compile => "compile",
            ValidationLevel::Test => "test",
            ValidationLevel::DependencyTree => "dependency:tree",
        }
    }

    /// Name used in result entries
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ValidationLevel::Compile => "Compile",
            ValidationLevel::Test => "Test",
            ValidationLevel::DependencyTree => "Dependency tree",
        }
    }
}

impl From<ValidationLevelConfig> for ValidationLevel {
    fn from(level: ValidationLevelConfig) -> Self {
        match level {
            ValidationLevelConfig::Compile => ValidationLevel::Compile,
            ValidationLevelConfig::Test => ValidationLevel::Test,
            ValidationLevelConfig::DependencyTree => ValidationLevel::DependencyTree,
        }
    }
}

/// Runs the configured validation levels after migration
pub struct PostMigrationValidator {
    runner: Arc<dyn CommandRunner>,
    project_root: PathBuf,
    program: String,
    extra_args: Vec<String>,
    levels: Vec<ValidationLevel>,
    conflict_markers: Vec<String>,
}

impl std::fmt::Debug for PostMigrationValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostMigrationValidator")
            .field("project_root", &self.project_root)
            .field("program", &self.program)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

impl PostMigrationValidator {
    /// Validator running `program` in `project_root`, compile level only
    #[must_use]
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        project_root: impl Into<PathBuf>,
        program: impl Into<String>,
    ) -> Self {
        Self {
            runner,
            project_root: project_root.into(),
            program: program.into(),
            extra_args: Vec::new(),
            levels: vec![ValidationLevel::Compile],
            conflict_markers: Vec::new(),
        }
    }

    /// Validator from the `[validation]` config section
    #[must_use]
    pub fn from_config(
        runner: Arc<dyn CommandRunner>,
        project_root: impl Into<PathBuf>,
        config: &ValidationConfig,
    ) -> Self {
        Self::new(runner, project_root, config.program.clone())
            .with_extra_args(config.extra_args.clone())
            .with_levels(config.levels.iter().copied().map(ValidationLevel::from).collect())
            .with_conflict_markers(config.conflict_markers.clone())
    }

    /// With arguments passed before every goal
    #[inline]
    #[must_use]
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// With levels, run in the given order
    #[inline]
    #[must_use]
    pub fn with_levels(mut self, levels: Vec<ValidationLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// With output markers that indicate a dependency conflict
    #[inline]
    #[must_use]
    pub fn with_conflict_markers(mut self, markers: Vec<String>) -> Self {
        self.conflict_markers = markers;
        self
    }

    /// Configured levels
    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[ValidationLevel] {
        &self.levels
    }

    /// Run every level until the first failure
    #[must_use]
    pub fn validate(&self) -> MigrationResult {
        let mut result = MigrationResult::new();
        if self.levels.is_empty() {
            result.add_change("No validation levels configured");
            return result;
        }

        for level in &self.levels {
            if !self.run_level(*level, &mut result) {
                tracing::warn!("{} validation failed; skipping remaining levels", level.label());
                break;
            }
        }
        result
    }

    /// Returns false when validation must stop
    fn run_level(&self, level: ValidationLevel, result: &mut MigrationResult) -> bool {
        let mut args = self.extra_args.clone();
        args.push(level.goal().to_string());
        tracing::info!(
            "Running {} {} in {}",
            self.program,
            args.join(" "),
            self.project_root.display()
        );

        let output = match self.runner.run(&self.program, &args, &self.project_root) {
            Ok(output) => output,
            Err(err) => {
                result.add_error(
                    PhaseError::Validation(format!("{} could not run: {err}", level.label()))
                        .to_string(),
                );
                return false;
            }
        };

        if !output.success() {
            let code = output
                .exit_code
                .map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string());
            result.add_error(
                PhaseError::Validation(format!(
                    "{} exited with code {code}\n{}",
                    level.label(),
                    output.output
                ))
                .to_string(),
            );
            return false;
        }

        match self
            .conflict_markers
            .iter()
            .find(|marker| output.output.contains(marker.as_str()))
        {
            Some(marker) => result.add_warning(format!(
                "{} passed but the output reports a dependency conflict ('{marker}')",
                level.label()
            )),
            None => result.add_change(format!("{} passed", level.label())),
        }
        true
    }
}
