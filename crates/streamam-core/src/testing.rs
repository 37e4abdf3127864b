//! In-memory resource-manager/node-manager doubles, shared by the crate's own
//! integration tests and the CLI's demo mode. Not behind `#[cfg(test)]`
//! because the CLI binary links against it too.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::domain::{ContainerHandle, ContainerId, CoreError, JobStatus, ResourceCapability};
use crate::ports::node_manager::{LaunchContext, NodeManagerClient};
use crate::ports::resource_manager::{ContainerRequest, ResourceManagerClient};

/// Grants every request immediately against a fixed node pool, emitting
/// `Allocated` events onto the event loop's channel as if the cluster had
/// replied.
pub struct InMemoryResourceManager {
    max_capability: ResourceCapability,
    events: mpsc::Sender<crate::domain::RmEvent>,
    next_container: AtomicU64,
    node_port: u16,
}

impl InMemoryResourceManager {
    pub fn new(max_capability: ResourceCapability, events: mpsc::Sender<crate::domain::RmEvent>) -> Self {
        Self {
            max_capability,
            events,
            next_container: AtomicU64::new(0),
            node_port: 9000,
        }
    }
}

#[async_trait]
impl ResourceManagerClient for InMemoryResourceManager {
    async fn register(
        &self,
        rpc_host: &str,
        rpc_port: u16,
        tracking_url: &str,
    ) -> Result<ResourceCapability, CoreError> {
        info!(rpc_host, rpc_port, tracking_url, "registering with in-memory resource manager");
        Ok(self.max_capability)
    }

    async fn request_container(&self, request: ContainerRequest) -> Result<(), CoreError> {
        let id = self.next_container.fetch_add(1, Ordering::SeqCst);
        let handle = ContainerHandle::new(
            ContainerId::new(format!("container-{id}")),
            format!("node-{}", id % 4),
            self.node_port,
            ResourceCapability::new(request.memory_mb, request.cpu_cores),
        );
        self.events
            .send(crate::domain::RmEvent::Allocated(handle))
            .await
            .map_err(|_| CoreError::ResourceManager("event loop channel closed".to_string()))
    }

    async fn release_container(&self, container_id: ContainerId) -> Result<(), CoreError> {
        info!(%container_id, "releasing container back to in-memory resource manager");
        Ok(())
    }

    async fn unregister(&self, status: JobStatus, message: &str, tracking_url: &str) -> Result<(), CoreError> {
        info!(?status, message, tracking_url, "unregistering from in-memory resource manager");
        Ok(())
    }
}

/// Records every launch it's asked to perform; never actually spawns a
/// process.
#[derive(Default)]
pub struct InMemoryNodeManager {
    launches: Mutex<Vec<(ContainerId, Vec<String>)>>,
}

impl InMemoryNodeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> Vec<(ContainerId, Vec<String>)> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeManagerClient for InMemoryNodeManager {
    async fn start_container(
        &self,
        container: &ContainerHandle,
        launch_context: LaunchContext,
    ) -> Result<(), CoreError> {
        info!(container = %container, command = ?launch_context.command, "starting container (in-memory)");
        self.launches
            .lock()
            .unwrap()
            .push((container.id.clone(), launch_context.command));
        Ok(())
    }
}
