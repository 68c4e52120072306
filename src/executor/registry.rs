use super::{Executor, ToolExecutor};
use crate::traits::CommandExecutor;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Trait for executor registry that manages available executors
pub trait ExecutorRegistry: Send + Sync {
    /// Register an executor with the given name
    fn register(&mut self, name: String, executor: Box<dyn Executor>);

    /// Get an executor by name
    fn get(&self, name: &str) -> Result<Arc<dyn Executor>>;

    /// Check if an executor is registered
    fn has(&self, name: &str) -> bool;

    /// List all registered executor names
    fn list(&self) -> Vec<String>;
}

/// Default implementation of executor registry using a HashMap
pub struct DefaultExecutorRegistry {
    executors: RwLock<HashMap<String, Arc<dyn Executor>>>,
}

impl DefaultExecutorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            executors: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the default executors (Terraform, OpenTofu)
    pub fn with_defaults(command: Arc<dyn CommandExecutor>) -> Self {
        let mut registry = Self::new();
        registry.register(
            "terraform".to_string(),
            Box::new(ToolExecutor::terraform(Arc::clone(&command))),
        );
        registry.register(
            "opentofu".to_string(),
            Box::new(ToolExecutor::opentofu(command)),
        );
        registry
    }
}

impl ExecutorRegistry for DefaultExecutorRegistry {
    fn register(&mut self, name: String, executor: Box<dyn Executor>) {
        let mut executors = self.executors.write().unwrap();
        executors.insert(name, Arc::from(executor));
    }

    fn get(&self, name: &str) -> Result<Arc<dyn Executor>> {
        let executors = self.executors.read().unwrap();
        executors
            .get(name)
            .cloned()
            .with_context(|| format!("Unknown executor: {}", name))
    }

    fn has(&self, name: &str) -> bool {
        let executors = self.executors.read().unwrap();
        executors.contains_key(name)
    }

    fn list(&self) -> Vec<String> {
        let executors = self.executors.read().unwrap();
        executors.keys().cloned().collect()
    }
}
