use std::fmt;
use std::process::Output;

/// Captured failure of one external tool invocation
#[derive(Debug)]
pub struct StepFailure {
    /// The command that failed (e.g. "terraform plan")
    pub command: String,
    /// The tool's combined stdout/stderr, verbatim
    pub diagnostics: String,
    /// Exit code, when the process ran at all
    pub exit_code: Option<i32>,
}

impl StepFailure {
    pub fn from_output(command: impl Into<String>, output: &Output) -> Self {
        let mut diagnostics = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim_end();

        if !stderr.is_empty() {
            if !diagnostics.is_empty() {
                diagnostics.push('\n');
            }
            diagnostics.push_str(stderr);
        }

        Self {
            command: command.into(),
            diagnostics,
            exit_code: output.status.code(),
        }
    }

    pub fn from_error(command: impl Into<String>, err: anyhow::Error) -> Self {
        Self {
            command: command.into(),
            diagnostics: format!("{:#}", err),
            exit_code: None,
        }
    }
}

/// Fatal error kinds for the reconcile workflow.
///
/// Individual import attempt failures are not represented here: they are
/// recorded per directive in the report and never abort the run.
#[derive(Debug)]
pub enum ReconcileError {
    /// The configured provisioning tool is not on PATH
    ExecutorUnavailable { name: String },

    /// Initialization failed; nothing after it was attempted
    InitFailed(StepFailure),

    /// Plan failed: declared configuration and imported state disagree
    PlanFailed(StepFailure),

    /// Apply failed; external state may be partially applied
    ApplyFailed(StepFailure),
}

impl ReconcileError {
    fn step_failure(&self) -> Option<&StepFailure> {
        match self {
            ReconcileError::ExecutorUnavailable { .. } => None,
            ReconcileError::InitFailed(f)
            | ReconcileError::PlanFailed(f)
            | ReconcileError::ApplyFailed(f) => Some(f),
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::ExecutorUnavailable { name } => {
                return write!(f, "{} is not installed or not available in PATH", name);
            }
            ReconcileError::InitFailed(_) => write!(f, "Initialization failed")?,
            ReconcileError::PlanFailed(_) => write!(f, "Plan failed")?,
            ReconcileError::ApplyFailed(_) => write!(f, "Apply failed")?,
        }

        if let Some(failure) = self.step_failure() {
            write!(f, ": command '{}' failed", failure.command)?;

            if let Some(code) = failure.exit_code {
                write!(f, " (exit code {})", code)?;
            }

            if !failure.diagnostics.is_empty() {
                write!(f, "\n{}", failure.diagnostics)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ReconcileError {}

/// Result type for reconcile operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::command::exit_status;

    fn failed_output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: exit_status(code),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_step_failure_combines_streams() {
        let output = failed_output(1, "partial plan\n", "Error: address not found\n");
        let failure = StepFailure::from_output("terraform plan", &output);

        assert_eq!(failure.exit_code, Some(1));
        assert_eq!(failure.diagnostics, "partial plan\nError: address not found");
    }

    #[test]
    fn test_display_includes_diagnostics_verbatim() {
        let output = failed_output(1, "", "Error: Resource already managed\n");
        let err = ReconcileError::PlanFailed(StepFailure::from_output("terraform plan", &output));

        let text = err.to_string();
        assert!(text.contains("Plan failed"));
        assert!(text.contains("exit code 1"));
        assert!(text.contains("Error: Resource already managed"));
    }

    #[test]
    fn test_display_executor_unavailable() {
        let err = ReconcileError::ExecutorUnavailable {
            name: "opentofu".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "opentofu is not installed or not available in PATH"
        );
    }
}
