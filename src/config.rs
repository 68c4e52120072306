use crate::reconcile::AddressingConfig;
use crate::traits::{FileSystem, UserInput};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "tfadopt.yaml";

/// On-disk configuration. Everything is optional; CLI flags and environment
/// take precedence. There are no built-in defaults for the region or the
/// VPC ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AdoptConfig {
    /// AWS region the VPC lives in
    pub region: Option<String>,
    /// ID of the VPC to adopt
    pub vpc_id: Option<String>,
    /// Provisioning tool name (terraform or opentofu)
    pub executor: Option<String>,
    /// Import address construction settings
    pub addressing: AddressingConfig,
}

impl AdoptConfig {
    /// Load configuration from a YAML file; a missing file yields defaults
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            return Ok(Self::default());
        }

        let contents = fs.read_to_string(path)?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// Region resolution: flag (or AWS_REGION via the flag's env fallback),
/// then config file. Missing everywhere is an error, not a default.
pub fn resolve_region(flag: Option<&str>, config: &AdoptConfig) -> Result<String> {
    flag.map(str::to_owned)
        .or_else(|| config.region.clone())
        .context("No region configured: pass --region, set AWS_REGION, or add 'region' to tfadopt.yaml")
}

/// VPC ID resolution: flag, then config file, then an interactive prompt.
/// The prompt is the only interactive touchpoint in the tool.
pub fn resolve_vpc_id(
    flag: Option<&str>,
    config: &AdoptConfig,
    input: &dyn UserInput,
) -> Result<String> {
    if let Some(id) = flag {
        return Ok(id.to_string());
    }
    if let Some(id) = &config.vpc_id {
        return Ok(id.clone());
    }

    let answer = input.text("VPC ID to adopt:", None)?;
    let answer = answer.trim();
    if answer.is_empty() {
        anyhow::bail!("A VPC ID is required");
    }
    Ok(answer.to_string())
}

/// Executor resolution: flag, then config file, then terraform
pub fn resolve_executor(flag: Option<&str>, config: &AdoptConfig) -> String {
    flag.map(str::to_owned)
        .or_else(|| config.executor.clone())
        .unwrap_or_else(|| "terraform".to_string())
}
