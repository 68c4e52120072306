//! Scaffolding of the two-tier Terraform module tree.
//!
//! Layout: the root module at the target directory (where the tool is run)
//! and the resource module at `modules/network`. Rewriting an existing tree
//! overwrites file contents without diffing; identical templates produce
//! identical files.

pub mod templates;
pub mod tfvars;

use crate::traits::FileSystem;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the nested resource module, fixed by the scaffolded templates
pub const NETWORK_MODULE: &str = "network";

/// Writes the module tree for an adoption target
pub struct ModuleScaffolder<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> ModuleScaffolder<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Create (or overwrite) the module tree under `root`, returning the
    /// paths written. Intermediate directories are created as needed and
    /// existing ones are left alone.
    pub fn scaffold(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let module_dir = root.join("modules").join(NETWORK_MODULE);
        self.fs.create_dir_all(&module_dir)?;

        let files = [
            (root.join("main.tf"), templates::ROOT_MAIN_TF),
            (root.join("variables.tf"), templates::ROOT_VARIABLES_TF),
            (root.join("backend.tf"), templates::ROOT_BACKEND_TF),
            (module_dir.join("main.tf"), templates::NETWORK_MAIN_TF),
            (module_dir.join("variables.tf"), templates::NETWORK_VARIABLES_TF),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (path, contents) in files {
            self.fs.write(&path, contents)?;
            written.push(path);
        }

        Ok(written)
    }
}
