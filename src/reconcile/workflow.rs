use std::path::Path;
use std::process::Output as ProcessOutput;

use crate::executor::Executor;
use crate::reconcile::directive::ImportDirective;
use crate::reconcile::error::{ReconcileError, ReconcileResult, StepFailure};
use crate::traits::Output;

/// Options for the reconcile workflow
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Whether to run apply after a successful plan
    pub run_apply: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { run_apply: true }
    }
}

/// Status of one import attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Succeeded,
    Failed,
}

/// Result of one import directive
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub directive: ImportDirective,
    pub status: ImportStatus,
    /// The tool's verbatim diagnostics for failed attempts
    pub diagnostics: Option<String>,
}

/// Result of a full workflow run that reached at least the plan step
#[derive(Debug)]
pub struct ReconcileReport {
    /// Per-directive outcomes, in issue order
    pub outcomes: Vec<ImportOutcome>,
    /// Whether apply ran (false when disabled via options)
    pub applied: bool,
}

impl ReconcileReport {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ImportStatus::Succeeded)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ImportStatus::Failed)
            .count()
    }
}

/// Drives the provisioning tool over a batch of import directives.
///
/// The run moves through Uninitialized → Initialized → ImportAttempted →
/// Planned → Applied. Plan is reached no matter how many individual imports
/// failed; Applied is reached only from a successful plan. Failures of init,
/// plan or apply halt the run; failures of individual import attempts are
/// recorded and the batch continues. The workflow keeps no bookkeeping of
/// prior runs; whether an address is already bound is the tool's call, so
/// per-resource exit signals are surfaced, never swallowed.
pub struct ReconcileWorkflow<'a> {
    executor: &'a dyn Executor,
    output: &'a dyn Output,
    options: ReconcileOptions,
}

impl<'a> ReconcileWorkflow<'a> {
    pub fn new(
        executor: &'a dyn Executor,
        output: &'a dyn Output,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            executor,
            output,
            options,
        }
    }

    /// Execute the full workflow in the scaffolded root directory
    pub fn execute(
        &self,
        directives: &[ImportDirective],
        root: &Path,
    ) -> ReconcileResult<ReconcileReport> {
        if !self.executor.check_installed().unwrap_or(false) {
            return Err(ReconcileError::ExecutorUnavailable {
                name: self.executor.name().to_string(),
            });
        }

        self.output
            .info(&format!("Running {} init...", self.executor.name()));
        self.run_init(root)?;
        self.output.success("Working directory initialized");

        let outcomes = self.run_imports(directives, root);
        let failed = outcomes
            .iter()
            .filter(|o| o.status == ImportStatus::Failed)
            .count();
        if failed > 0 {
            self.output.warning(&format!(
                "{} of {} import attempts failed; continuing to plan",
                failed,
                outcomes.len()
            ));
        }

        self.output
            .info(&format!("Running {} plan...", self.executor.name()));
        self.run_plan(root)?;

        let applied = if self.options.run_apply {
            self.output
                .info(&format!("Running {} apply...", self.executor.name()));
            self.run_apply(root)?;
            self.output.success("Apply complete");
            true
        } else {
            self.output.info("Apply skipped");
            false
        };

        Ok(ReconcileReport { outcomes, applied })
    }

    /// Issue every import attempt, one invocation per directive. A failed
    /// attempt (already bound, unknown address, spawn error) is recorded
    /// with the tool's diagnostics and the batch continues.
    fn run_imports(&self, directives: &[ImportDirective], root: &Path) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::with_capacity(directives.len());

        for directive in directives {
            self.output.info(&format!(
                "Importing {} into {}",
                directive.resource_id, directive.address
            ));

            let outcome = match self
                .executor
                .import(root, &directive.address, &directive.resource_id)
            {
                Ok(output) if output.status.success() => ImportOutcome {
                    directive: directive.clone(),
                    status: ImportStatus::Succeeded,
                    diagnostics: None,
                },
                Ok(output) => {
                    let failure = StepFailure::from_output("import", &output);
                    self.output
                        .warning(&format!("Import of {} failed", directive.resource_id));
                    self.surface(&failure.diagnostics);
                    ImportOutcome {
                        directive: directive.clone(),
                        status: ImportStatus::Failed,
                        diagnostics: Some(failure.diagnostics),
                    }
                }
                Err(err) => {
                    let diagnostics = format!("{:#}", err);
                    self.output
                        .warning(&format!("Import of {} failed", directive.resource_id));
                    self.surface(&diagnostics);
                    ImportOutcome {
                        directive: directive.clone(),
                        status: ImportStatus::Failed,
                        diagnostics: Some(diagnostics),
                    }
                }
            };

            outcomes.push(outcome);
        }

        outcomes
    }

    fn run_init(&self, root: &Path) -> ReconcileResult<()> {
        let command = format!("{} init", self.executor.binary());
        let output = self.executor.init(root).map_err(|e| {
            ReconcileError::InitFailed(StepFailure::from_error(command.as_str(), e))
        })?;

        self.check_step(command, &output, ReconcileError::InitFailed)
    }

    fn run_plan(&self, root: &Path) -> ReconcileResult<()> {
        let command = format!("{} plan", self.executor.binary());
        let output = self.executor.plan(root).map_err(|e| {
            ReconcileError::PlanFailed(StepFailure::from_error(command.as_str(), e))
        })?;

        self.check_step(command, &output, ReconcileError::PlanFailed)?;

        // The plan output is the operator's view of the computed delta
        self.surface(String::from_utf8_lossy(&output.stdout).trim_end());
        Ok(())
    }

    fn run_apply(&self, root: &Path) -> ReconcileResult<()> {
        let command = format!("{} apply", self.executor.binary());
        let output = self.executor.apply(root).map_err(|e| {
            ReconcileError::ApplyFailed(StepFailure::from_error(command.as_str(), e))
        })?;

        self.check_step(command, &output, ReconcileError::ApplyFailed)?;

        self.surface(String::from_utf8_lossy(&output.stdout).trim_end());
        Ok(())
    }

    fn check_step(
        &self,
        command: String,
        output: &ProcessOutput,
        to_error: fn(StepFailure) -> ReconcileError,
    ) -> ReconcileResult<()> {
        if output.status.success() {
            return Ok(());
        }

        let failure = StepFailure::from_output(command, output);
        self.surface(&failure.diagnostics);
        Err(to_error(failure))
    }

    fn surface(&self, diagnostics: &str) {
        if !diagnostics.trim().is_empty() {
            self.output.raw(diagnostics);
        }
    }
}
