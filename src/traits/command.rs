use anyhow::Result;
use std::path::Path;
use std::process::{Command, Output};

/// Trait for executing system commands, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments and return its captured output
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        let output = Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .output()?;

        Ok(output)
    }
}

/// A single invocation captured by MockCommandExecutor
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: std::path::PathBuf,
}

/// Pre-configured result for MockCommandExecutor
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
impl MockCommandResult {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Mock command executor for testing: records every invocation and replays
/// pre-configured results in order. When the result queue is exhausted,
/// invocations succeed with empty output.
#[cfg(test)]
pub struct MockCommandExecutor {
    results: std::sync::Mutex<std::collections::VecDeque<MockCommandResult>>,
    calls: std::sync::Mutex<Vec<RecordedCall>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            results: std::sync::Mutex::new(std::collections::VecDeque::new()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_results(results: Vec<MockCommandResult>) -> Self {
        Self {
            results: std::sync::Mutex::new(results.into()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        });

        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(MockCommandResult::success);

        Ok(Output {
            status: exit_status(result.exit_code),
            stdout: result.stdout.into_bytes(),
            stderr: result.stderr.into_bytes(),
        })
    }
}

/// Build an ExitStatus from a raw code for mock process results
#[cfg(test)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; go through the platform extension
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        // from_raw expects a wait() status word, where the exit code sits in the high byte
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mock_executor_replays_results_in_order() {
        let executor = MockCommandExecutor::with_results(vec![
            MockCommandResult {
                exit_code: 0,
                stdout: "first".to_string(),
                stderr: String::new(),
            },
            MockCommandResult::failure(1, "boom"),
        ]);

        let first = executor
            .execute("terraform", &["init"], &PathBuf::from("."))
            .unwrap();
        assert!(first.status.success());
        assert_eq!(String::from_utf8_lossy(&first.stdout), "first");

        let second = executor
            .execute("terraform", &["plan"], &PathBuf::from("."))
            .unwrap();
        assert!(!second.status.success());
        assert_eq!(second.status.code(), Some(1));
        assert_eq!(String::from_utf8_lossy(&second.stderr), "boom");
    }

    #[test]
    fn test_mock_executor_default_success_when_exhausted() {
        let executor = MockCommandExecutor::new();
        let output = executor
            .execute("terraform", &[], &PathBuf::from("."))
            .unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn test_mock_executor_records_calls() {
        let executor = MockCommandExecutor::new();
        executor
            .execute("terraform", &["import", "addr", "id"], &PathBuf::from("/tmp"))
            .unwrap();

        let calls = executor.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].command, "terraform");
        assert_eq!(calls[0].args, vec!["import", "addr", "id"]);
        assert_eq!(calls[0].working_dir, PathBuf::from("/tmp"));
    }
}
