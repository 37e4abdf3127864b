//! Typed configuration mirroring the external configuration surface.
//!
//! Loading from file/environment happens in the CLI crate (it owns the
//! `config` dependency); the canonical key names in the table below
//! (`task.count`, `yarn.container.memory.mb`, ...) are what the CLI reads out
//! of the layered `config::Config` source and maps onto these fields. This
//! type only defines the shape and the validation a loaded value must pass
//! before the lifecycle coordinator ever registers with the resource
//! manager.

use crate::domain::CoreError;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// `task.count`
    pub task_count: u32,
    /// `yarn.container.memory.mb`
    pub container_memory_mb: u32,
    /// `yarn.container.cpu.cores`
    pub container_cpu_cores: u32,
    /// `yarn.container.retry.count`
    pub retry_count: i32,
    /// `yarn.container.retry.window.ms`
    pub retry_window_millis: i64,
    /// `yarn.package.path`
    pub package_path: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            task_count: 1,
            container_memory_mb: 1024,
            container_cpu_cores: 1,
            retry_count: 8,
            retry_window_millis: 300_000,
            package_path: String::new(),
        }
    }
}

impl CoreConfig {
    /// Checked once at startup, before any resource-manager registration is
    /// attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.task_count == 0 {
            return Err(CoreError::Config("task.count must be positive".to_string()));
        }
        if self.package_path.trim().is_empty() {
            return Err(CoreError::Config("yarn.package.path is required".to_string()));
        }
        Ok(())
    }
}
