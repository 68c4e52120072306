use anyhow::Result;
use std::path::Path;
use std::process::Output;

/// Trait for Infrastructure as Code provisioning tools (Terraform, OpenTofu).
///
/// Every operation runs in the scaffolded root directory and returns the
/// child process output with captured stdout/stderr; callers decide what to
/// surface and never discard the streams. None of the operations retry.
pub trait Executor: Send + Sync {
    /// Check if the tool is installed and available
    /// Typically runs a version command to verify
    fn check_installed(&self) -> Result<bool>;

    /// Initialize the working directory (providers, backend)
    fn init(&self, working_dir: &Path) -> Result<Output>;

    /// Bind one declared resource address to an existing resource ID
    fn import(&self, working_dir: &Path, address: &str, resource_id: &str) -> Result<Output>;

    /// Compute the delta between declared configuration and real state
    fn plan(&self, working_dir: &Path) -> Result<Output>;

    /// Apply the declared configuration, auto-confirming
    fn apply(&self, working_dir: &Path) -> Result<Output>;

    /// Get the name of this executor (e.g., "terraform", "opentofu")
    fn name(&self) -> &str;

    /// The binary the executor invokes
    fn binary(&self) -> &str;
}
