//! Integration tests for the tfadopt CLI
//!
//! These tests verify CLI commands work correctly end-to-end. Nothing here
//! touches AWS or a real provisioning tool.

use std::process::Command;

/// Get the path to the tfadopt binary
fn tfadopt_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("tfadopt");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run tfadopt and return output
fn run_tfadopt(args: &[&str]) -> std::process::Output {
    Command::new(tfadopt_binary())
        .args(args)
        .output()
        .expect("Failed to execute tfadopt")
}

#[test]
fn test_version() {
    let output = run_tfadopt(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tfadopt"));
}

#[test]
fn test_help() {
    let output = run_tfadopt(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("scaffold"));
    assert!(stdout.contains("discover"));
    assert!(stdout.contains("adopt"));
}

#[test]
fn test_scaffold_help() {
    let output = run_tfadopt(&["scaffold", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--dir"));
}

#[test]
fn test_discover_help() {
    let output = run_tfadopt(&["discover", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--region"));
    assert!(stdout.contains("--vpc-id"));
    assert!(stdout.contains("--json"));
}

#[test]
fn test_adopt_help() {
    let output = run_tfadopt(&["adopt", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--skip-apply"));
    assert!(stdout.contains("--script-only"));
    assert!(stdout.contains("--executor"));
}

#[test]
fn test_invalid_command() {
    let output = run_tfadopt(&["invalid-command-that-does-not-exist"]);

    // Should fail with non-zero exit code
    assert!(!output.status.success());
}

// ============================================================================
// End-to-end workflow tests with temp directories
// ============================================================================

mod workflow_tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper to verify no panic occurred in command output
    fn assert_no_panic(output: &std::process::Output, context: &str) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            !stderr.contains("panic") && !stderr.contains("RUST_BACKTRACE"),
            "{} panicked.\nstderr: {}",
            context,
            stderr
        );
    }

    #[test]
    fn test_scaffold_writes_module_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().to_str().unwrap();

        let output = run_tfadopt(&["scaffold", "--dir", dir]);

        assert_no_panic(&output, "scaffold");
        assert!(output.status.success());

        assert!(temp_dir.path().join("main.tf").exists());
        assert!(temp_dir.path().join("variables.tf").exists());
        assert!(temp_dir.path().join("backend.tf").exists());
        assert!(temp_dir.path().join("modules/network/main.tf").exists());
        assert!(temp_dir.path().join("modules/network/variables.tf").exists());
    }

    #[test]
    fn test_scaffold_twice_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().to_str().unwrap();

        assert!(run_tfadopt(&["scaffold", "--dir", dir]).status.success());
        let first = std::fs::read_to_string(temp_dir.path().join("main.tf")).unwrap();

        assert!(run_tfadopt(&["scaffold", "--dir", dir]).status.success());
        let second = std::fs::read_to_string(temp_dir.path().join("main.tf")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_adopt_without_region_fails_gracefully() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let output = Command::new(tfadopt_binary())
            .args(["adopt", "--vpc-id", "vpc-123"])
            .current_dir(temp_dir.path())
            .env_remove("AWS_REGION")
            .output()
            .expect("Failed to execute tfadopt");

        assert_no_panic(&output, "adopt without region");
        assert!(!output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("No region configured"));
    }

    #[test]
    fn test_discover_with_malformed_config_fails_gracefully() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("tfadopt.yaml"), "region: [broken").unwrap();

        let output = Command::new(tfadopt_binary())
            .args(["discover", "--vpc-id", "vpc-123"])
            .current_dir(temp_dir.path())
            .output()
            .expect("Failed to execute tfadopt");

        assert_no_panic(&output, "discover with malformed config");
        assert!(!output.status.success());
    }
}
