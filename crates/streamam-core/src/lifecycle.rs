//! Lifecycle Coordinator: registers the application master, validates the
//! cluster's granted capability against what the job requires, and
//! unregisters on shutdown. Registered before the task manager so that a
//! capability rejection prevents any container request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::{ContainerHandle, ContainerId, CoreError, ExitStatus, JobState, JobStatus, ResourceCapability};
use crate::listener::Listener;
use crate::ports::resource_manager::ResourceManagerClient;

pub struct LifecycleCoordinator {
    resource_manager: Arc<dyn ResourceManagerClient>,
    rpc_host: String,
    rpc_port: u16,
    tracking_url: String,
    required_capability: ResourceCapability,
}

impl LifecycleCoordinator {
    pub fn new(
        resource_manager: Arc<dyn ResourceManagerClient>,
        rpc_host: impl Into<String>,
        rpc_port: u16,
        tracking_url: impl Into<String>,
        required_capability: ResourceCapability,
    ) -> Self {
        Self {
            resource_manager,
            rpc_host: rpc_host.into(),
            rpc_port,
            tracking_url: tracking_url.into(),
            required_capability,
        }
    }
}

#[async_trait]
impl Listener for LifecycleCoordinator {
    async fn on_init(&mut self, state: &mut JobState) -> Result<(), CoreError> {
        let granted = self
            .resource_manager
            .register(&self.rpc_host, self.rpc_port, &self.tracking_url)
            .await?;

        if !granted.satisfies(self.required_capability) {
            error!(?granted, required = ?self.required_capability, "cluster cannot satisfy required capability");
            state.mark_rejected();
            return Err(CoreError::CapabilityRejected {
                granted,
                required: self.required_capability,
            });
        }

        info!(?granted, "registered with resource manager");
        Ok(())
    }

    async fn on_container_allocated(
        &mut self,
        _state: &mut JobState,
        _container: ContainerHandle,
    ) -> Result<(), CoreError> {
        Ok(())
    }

    async fn on_container_completed(
        &mut self,
        _state: &mut JobState,
        _container_id: ContainerId,
        _exit_status: ExitStatus,
    ) -> Result<(), CoreError> {
        Ok(())
    }

    async fn on_reboot(&mut self, state: &mut JobState) -> Result<(), CoreError> {
        error!("reboot signal received; this application master does not support recovery");
        state.mark_fatal();
        Err(CoreError::Reboot)
    }

    async fn on_shutdown(&mut self, state: &mut JobState) -> Result<(), CoreError> {
        let status = state.status();
        let message = match status {
            JobStatus::Succeeded => "job completed successfully",
            JobStatus::Failed => "job failed",
            JobStatus::Undefined => "shutting down with no job outcome declared",
        };
        info!(?status, "unregistering from resource manager");
        self.resource_manager
            .unregister(status, message, &self.tracking_url)
            .await
    }
}
