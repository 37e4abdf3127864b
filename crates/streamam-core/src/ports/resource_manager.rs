//! Resource-manager client port.
//!
//! The real implementation speaks the cluster's RPC protocol and turns its
//! async callbacks into [`crate::domain::RmEvent`] values on the event loop's
//! channel; this trait only covers the outbound half (register/request/
//! release/unregister). Production retry of outbound RPC failures is the
//! client's responsibility, not the core's (see the error handling design).

use async_trait::async_trait;

use crate::domain::{ContainerId, CoreError, JobStatus, ResourceCapability};

#[derive(Debug, Clone, Copy)]
pub struct ContainerRequest {
    pub memory_mb: u32,
    pub cpu_cores: u32,
    pub priority: u32,
}

impl ContainerRequest {
    /// Requests are always fixed priority 0 with no locality constraints.
    pub fn new(memory_mb: u32, cpu_cores: u32) -> Self {
        Self {
            memory_mb,
            cpu_cores,
            priority: 0,
        }
    }
}

#[async_trait]
pub trait ResourceManagerClient: Send + Sync {
    /// Register the application master, returning the cluster's maximum
    /// grantable resource capability.
    async fn register(
        &self,
        rpc_host: &str,
        rpc_port: u16,
        tracking_url: &str,
    ) -> Result<ResourceCapability, CoreError>;

    async fn request_container(&self, request: ContainerRequest) -> Result<(), CoreError>;

    async fn release_container(&self, container_id: ContainerId) -> Result<(), CoreError>;

    async fn unregister(
        &self,
        status: JobStatus,
        message: &str,
        tracking_url: &str,
    ) -> Result<(), CoreError>;
}
