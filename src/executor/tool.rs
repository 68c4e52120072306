use super::Executor;
use crate::traits::CommandExecutor;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Output;
use std::sync::Arc;

/// Executor for Terraform-compatible CLIs. Terraform and OpenTofu share a
/// command surface; only the binary differs.
pub struct ToolExecutor {
    name: &'static str,
    binary: &'static str,
    command: Arc<dyn CommandExecutor>,
}

impl ToolExecutor {
    pub fn terraform(command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            name: "terraform",
            binary: "terraform",
            command,
        }
    }

    pub fn opentofu(command: Arc<dyn CommandExecutor>) -> Self {
        Self {
            name: "opentofu",
            binary: "tofu",
            command,
        }
    }

    fn run(&self, args: &[&str], working_dir: &Path) -> Result<Output> {
        self.command
            .execute(self.binary, args, working_dir)
            .with_context(|| format!("Failed to execute {} {}", self.binary, args.join(" ")))
    }
}

impl Executor for ToolExecutor {
    fn check_installed(&self) -> Result<bool> {
        match self.command.execute(self.binary, &["--version"], Path::new(".")) {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false), // Command not found or failed to execute
        }
    }

    fn init(&self, working_dir: &Path) -> Result<Output> {
        self.run(&["init", "-input=false"], working_dir)
    }

    fn import(&self, working_dir: &Path, address: &str, resource_id: &str) -> Result<Output> {
        self.run(&["import", "-input=false", address, resource_id], working_dir)
    }

    fn plan(&self, working_dir: &Path) -> Result<Output> {
        self.run(&["plan", "-input=false"], working_dir)
    }

    fn apply(&self, working_dir: &Path) -> Result<Output> {
        self.run(
            &["apply", "-input=false", "-auto-approve"],
            working_dir,
        )
    }

    fn name(&self) -> &str {
        self.name
    }

    fn binary(&self) -> &str {
        self.binary
    }
}
