//! End-to-end scenarios driven through the public event loop API with the
//! in-memory resource-manager/node-manager doubles and a fixed clock.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use streamam_core::domain::{
    ContainerId, CoreError, JobStatus, PartitionRef, ResourceCapability,
};
use streamam_core::ports::node_manager::{ApplicationVisibility, ArchiveType, Credentials, PackageResource};
use streamam_core::ports::resource_manager::{ContainerRequest, ResourceManagerClient};
use streamam_core::ports::ShellCommandBuilder;
use streamam_core::testing::InMemoryNodeManager;
use streamam_core::{EventLoop, FixedClock, LifecycleCoordinator, TaskManager, TaskManagerConfig};

struct CappedResourceManager {
    max_capability: ResourceCapability,
}

#[async_trait]
impl ResourceManagerClient for CappedResourceManager {
    async fn register(
        &self,
        _rpc_host: &str,
        _rpc_port: u16,
        _tracking_url: &str,
    ) -> Result<ResourceCapability, CoreError> {
        Ok(self.max_capability)
    }

    async fn request_container(&self, _request: ContainerRequest) -> Result<(), CoreError> {
        panic!("capability rejection must prevent any container request");
    }

    async fn release_container(&self, _container_id: ContainerId) -> Result<(), CoreError> {
        Ok(())
    }

    async fn unregister(&self, _status: JobStatus, _message: &str, _tracking_url: &str) -> Result<(), CoreError> {
        Ok(())
    }
}

fn task_manager_config() -> TaskManagerConfig {
    TaskManagerConfig {
        job_name: "orders-join".to_string(),
        container_memory_mb: 1024,
        container_cpu_cores: 2,
        package: PackageResource {
            url: "hdfs://cluster/packages/orders-join.tgz".to_string(),
            size_bytes: 1,
            timestamp_millis: 0,
            archive_type: ArchiveType::TarGz,
            visibility: ApplicationVisibility::Application,
        },
        all_partitions: vec![PartitionRef::new("kafka", "orders", 0)],
        credentials: Credentials::default(),
    }
}

#[tokio::test]
async fn scenario_s5_capability_rejection_shuts_down_without_requesting_containers() {
    let rm = Arc::new(CappedResourceManager {
        max_capability: ResourceCapability::new(512, 2),
    });
    let task_manager = TaskManager::new(
        task_manager_config(),
        rm.clone(),
        Arc::new(InMemoryNodeManager::new()),
        Arc::new(ShellCommandBuilder),
        Arc::new(FixedClock::new(0)),
        8,
        300_000,
    );
    let lifecycle = LifecycleCoordinator::new(
        rm,
        "am-host",
        0,
        "http://am-host/status",
        ResourceCapability::new(1024, 2),
    );

    let (_tx, rx) = mpsc::channel(8);
    let (mut event_loop, snapshots) =
        EventLoop::new(1, vec![Box::new(lifecycle), Box::new(task_manager)], rx, Duration::from_millis(10));

    event_loop.run().await;

    let snapshot = snapshots.borrow().clone();
    assert_eq!(snapshot.status, JobStatus::Failed);
    assert_eq!(snapshot.needed_containers, 0);
}
