//! Task Manager: binds task groups to allocated containers, launches workers,
//! and drives the retry/replacement policy on completion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::assign::assign;
use crate::clock::Clock;
use crate::domain::{ContainerHandle, ContainerId, CoreError, ExitStatus, JobState, PartitionRef, TaskId};
use crate::failure::{FailureController, FailureDecision};
use crate::listener::Listener;
use crate::ports::command_builder::{CommandBuilder, CommandContext};
use crate::ports::node_manager::{Credentials, LaunchContext, NodeManagerClient, PackageResource};
use crate::ports::resource_manager::{ContainerRequest, ResourceManagerClient};

pub struct TaskManagerConfig {
    pub job_name: String,
    pub container_memory_mb: u32,
    pub container_cpu_cores: u32,
    pub package: PackageResource,
    pub all_partitions: Vec<PartitionRef>,
    pub credentials: Credentials,
}

pub struct TaskManager {
    config: TaskManagerConfig,
    resource_manager: Arc<dyn ResourceManagerClient>,
    node_manager: Arc<dyn NodeManagerClient>,
    command_builder: Arc<dyn CommandBuilder>,
    clock: Arc<dyn Clock>,
    failures: FailureController,
}

impl TaskManager {
    pub fn new(
        config: TaskManagerConfig,
        resource_manager: Arc<dyn ResourceManagerClient>,
        node_manager: Arc<dyn NodeManagerClient>,
        command_builder: Arc<dyn CommandBuilder>,
        clock: Arc<dyn Clock>,
        retry_count: i32,
        retry_window_millis: i64,
    ) -> Self {
        Self {
            config,
            resource_manager,
            node_manager,
            command_builder,
            clock,
            failures: FailureController::new(retry_count, retry_window_millis),
        }
    }

    async fn request_containers(&self, count: u32) -> Result<(), CoreError> {
        let request = ContainerRequest::new(self.config.container_memory_mb, self.config.container_cpu_cores);
        for _ in 0..count {
            self.resource_manager.request_container(request).await?;
        }
        Ok(())
    }

    async fn launch(&self, state: &mut JobState, task_id: TaskId, container: ContainerHandle) -> Result<(), CoreError> {
        let partitions = assign(task_id, state.task_count(), &self.config.all_partitions);

        let ctx = CommandContext {
            job_name: self.config.job_name.clone(),
            task_id,
            stream_partitions: partitions.iter().cloned().collect(),
            package_path: self.config.package.url.clone(),
            log_dir: "<LOG_DIR>".to_string(),
        };
        let command = self.command_builder.build_command(&ctx);
        let environment = self.command_builder.build_environment(&ctx);

        let launch_context = LaunchContext {
            package: self.config.package.clone(),
            environment,
            command,
            credentials: self.config.credentials.sanitized_for_worker(),
        };

        info!(%task_id, container = %container, "launching worker container");
        self.node_manager
            .start_container(&container, launch_context)
            .await
            .map_err(|source| CoreError::NodeManager {
                task_id,
                source: source.to_string(),
            })?;

        state.bind(task_id, container, partitions);
        Ok(())
    }
}

#[async_trait]
impl Listener for TaskManager {
    async fn on_init(&mut self, state: &mut JobState) -> Result<(), CoreError> {
        if state.should_shutdown() {
            // Lifecycle coordinator already rejected capability; don't request anything.
            return Ok(());
        }
        state.init();
        info!(task_count = state.task_count(), "requesting initial containers");
        self.request_containers(state.needed_containers()).await
    }

    async fn on_container_allocated(
        &mut self,
        state: &mut JobState,
        container: ContainerHandle,
    ) -> Result<(), CoreError> {
        let Some(task_id) = state.peek_unclaimed() else {
            warn!(container = %container, "surplus allocation, releasing");
            return self
                .resource_manager
                .release_container(container.id)
                .await;
        };
        self.launch(state, task_id, container).await
    }

    async fn on_container_completed(
        &mut self,
        state: &mut JobState,
        container_id: ContainerId,
        exit_status: ExitStatus,
    ) -> Result<(), CoreError> {
        let task_id = state.task_for_container(&container_id);
        if let Some(task_id) = task_id {
            state.unbind(task_id);
        }

        if exit_status.is_clean() {
            if let Some(task_id) = task_id {
                self.failures.record_success(task_id);
            }
            state.record_clean_exit(task_id);
            info!(?task_id, %container_id, "clean container exit");
            return Ok(());
        }

        if exit_status.is_released() {
            state.record_release();
            warn!(?task_id, %container_id, "container released by cluster");
            if let Some(task_id) = task_id {
                state.requeue(task_id);
                self.request_containers(1).await?;
            }
            return Ok(());
        }

        state.record_crash();
        warn!(?task_id, %container_id, exit_status = exit_status.0, "worker crashed");
        if let Some(task_id) = task_id {
            state.requeue(task_id);
            let decision = self.failures.record_failure(task_id, self.clock.now_millis());
            match decision {
                FailureDecision::Fatal => {
                    state.mark_fatal();
                }
                FailureDecision::Retry => {
                    self.request_containers(1).await?;
                }
            }
        }
        Ok(())
    }

    async fn on_container_released(
        &mut self,
        _state: &mut JobState,
        container_id: ContainerId,
    ) -> Result<(), CoreError> {
        info!(%container_id, "container release acknowledged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::ResourceCapability;
    use crate::ports::node_manager::{ApplicationVisibility, ArchiveType};
    use crate::ports::ShellCommandBuilder;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockResourceManager {
        requested: Mutex<u32>,
        released: Mutex<Vec<ContainerId>>,
    }

    #[async_trait]
    impl ResourceManagerClient for MockResourceManager {
        async fn register(
            &self,
            _rpc_host: &str,
            _rpc_port: u16,
            _tracking_url: &str,
        ) -> Result<ResourceCapability, CoreError> {
            Ok(ResourceCapability::new(4096, 4))
        }

        async fn request_container(&self, _request: ContainerRequest) -> Result<(), CoreError> {
            *self.requested.lock().unwrap() += 1;
            Ok(())
        }

        async fn release_container(&self, container_id: ContainerId) -> Result<(), CoreError> {
            self.released.lock().unwrap().push(container_id);
            Ok(())
        }

        async fn unregister(
            &self,
            _status: crate::domain::JobStatus,
            _message: &str,
            _tracking_url: &str,
        ) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockNodeManager;

    #[async_trait]
    impl NodeManagerClient for MockNodeManager {
        async fn start_container(
            &self,
            _container: &ContainerHandle,
            _launch_context: LaunchContext,
        ) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn container(id: &str) -> ContainerHandle {
        ContainerHandle::new(ContainerId::new(id), "node-1", 9000, ResourceCapability::new(1024, 1))
    }

    fn manager(
        rm: Arc<MockResourceManager>,
        retry_count: i32,
        retry_window_millis: i64,
    ) -> (TaskManager, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(0));
        let manager = TaskManager::new(
            TaskManagerConfig {
                job_name: "orders-join".to_string(),
                container_memory_mb: 1024,
                container_cpu_cores: 1,
                package: PackageResource {
                    url: "hdfs://cluster/packages/orders-join.tgz".to_string(),
                    size_bytes: 100,
                    timestamp_millis: 0,
                    archive_type: ArchiveType::TarGz,
                    visibility: ApplicationVisibility::Application,
                },
                all_partitions: vec![PartitionRef::new("kafka", "orders", 0)],
                credentials: Credentials::default(),
            },
            rm,
            Arc::new(MockNodeManager),
            Arc::new(ShellCommandBuilder),
            clock.clone(),
            retry_count,
            retry_window_millis,
        );
        (manager, clock)
    }

    #[tokio::test]
    async fn happy_path_two_tasks_succeeds() {
        let rm = Arc::new(MockResourceManager::default());
        let (mut tm, _clock) = manager(rm.clone(), 2, 60_000);
        let mut state = JobState::new(2);

        tm.on_init(&mut state).await.unwrap();
        assert_eq!(*rm.requested.lock().unwrap(), 2);

        tm.on_container_allocated(&mut state, container("a")).await.unwrap();
        tm.on_container_allocated(&mut state, container("b")).await.unwrap();
        assert_eq!(state.running_tasks().len(), 2);

        tm.on_container_completed(&mut state, ContainerId::new("a"), ExitStatus::CLEAN)
            .await
            .unwrap();
        tm.on_container_completed(&mut state, ContainerId::new("b"), ExitStatus::CLEAN)
            .await
            .unwrap();

        assert_eq!(state.status(), crate::domain::JobStatus::Succeeded);
    }

    #[tokio::test]
    async fn surplus_allocation_is_released() {
        let rm = Arc::new(MockResourceManager::default());
        let (mut tm, _clock) = manager(rm.clone(), 2, 60_000);
        let mut state = JobState::new(1);

        tm.on_init(&mut state).await.unwrap();
        tm.on_container_allocated(&mut state, container("a")).await.unwrap();
        tm.on_container_allocated(&mut state, container("b")).await.unwrap();

        assert_eq!(rm.released.lock().unwrap().as_slice(), &[ContainerId::new("b")]);
        assert_eq!(state.running_tasks().len(), 1);
    }

    #[tokio::test]
    async fn tight_crash_loop_marks_job_fatal() {
        let rm = Arc::new(MockResourceManager::default());
        let (mut tm, clock) = manager(rm.clone(), 2, 60_000);
        let mut state = JobState::new(1);

        tm.on_init(&mut state).await.unwrap();
        tm.on_container_allocated(&mut state, container("a")).await.unwrap();

        clock.set(1_000);
        tm.on_container_completed(&mut state, ContainerId::new("a"), ExitStatus(1))
            .await
            .unwrap();
        assert_eq!(state.status(), crate::domain::JobStatus::Undefined);

        tm.on_container_allocated(&mut state, container("b")).await.unwrap();
        clock.set(2_000);
        tm.on_container_completed(&mut state, ContainerId::new("b"), ExitStatus(1))
            .await
            .unwrap();

        tm.on_container_allocated(&mut state, container("c")).await.unwrap();
        clock.set(3_000);
        tm.on_container_completed(&mut state, ContainerId::new("c"), ExitStatus(1))
            .await
            .unwrap();

        assert_eq!(state.status(), crate::domain::JobStatus::Failed);
        assert!(state.too_many_failed_containers());
    }

    #[tokio::test]
    async fn preemption_is_not_a_crash() {
        let rm = Arc::new(MockResourceManager::default());
        let (mut tm, _clock) = manager(rm.clone(), 0, 60_000);
        let mut state = JobState::new(1);

        tm.on_init(&mut state).await.unwrap();
        tm.on_container_allocated(&mut state, container("a")).await.unwrap();
        tm.on_container_completed(&mut state, ContainerId::new("a"), ExitStatus::RELEASED)
            .await
            .unwrap();

        assert_eq!(state.released_containers(), 1);
        assert_eq!(state.status(), crate::domain::JobStatus::Undefined);
        assert_eq!(*rm.requested.lock().unwrap(), 2);
    }
}
