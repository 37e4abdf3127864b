//! In-memory job state: the single source of truth for task-group ownership.
//!
//! All mutation happens on the event-dispatcher task (see
//! [`crate::event_loop::EventLoop`]); this type has no internal locking of its
//! own. Read-only access from other tasks goes through [`JobState::snapshot`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::container::ContainerHandle;
use super::ids::{ContainerId, TaskId};
use super::partition::PartitionRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Undefined,
    Succeeded,
    Failed,
}

/// Mutable job state. See §3 of the design for the invariants this type
/// upholds across `bind`/`requeue`/`record_clean_exit` calls.
#[derive(Debug, Clone)]
pub struct JobState {
    task_count: u32,
    unclaimed_tasks: HashSet<TaskId>,
    running_tasks: HashMap<TaskId, ContainerHandle>,
    container_owner: HashMap<ContainerId, TaskId>,
    finished_tasks: HashSet<TaskId>,
    task_partitions: HashMap<TaskId, HashSet<PartitionRef>>,
    needed_containers: u32,
    completed_tasks: u32,
    failed_containers: u32,
    released_containers: u32,
    too_many_failed_containers: bool,
    status: JobStatus,
    shutdown_requested: bool,
}

impl JobState {
    pub fn new(task_count: u32) -> Self {
        Self {
            task_count,
            unclaimed_tasks: HashSet::new(),
            running_tasks: HashMap::new(),
            container_owner: HashMap::new(),
            finished_tasks: HashSet::new(),
            task_partitions: HashMap::new(),
            needed_containers: 0,
            completed_tasks: 0,
            failed_containers: 0,
            released_containers: 0,
            too_many_failed_containers: false,
            status: JobStatus::Undefined,
            shutdown_requested: false,
        }
    }

    /// `onInit`: every task group starts unclaimed, one container needed each.
    pub fn init(&mut self) {
        self.unclaimed_tasks = (0..self.task_count).map(TaskId::new).collect();
        self.needed_containers = self.task_count;
    }

    pub fn task_count(&self) -> u32 {
        self.task_count
    }

    pub fn needed_containers(&self) -> u32 {
        self.needed_containers
    }

    pub fn unclaimed_tasks(&self) -> &HashSet<TaskId> {
        &self.unclaimed_tasks
    }

    pub fn running_tasks(&self) -> &HashMap<TaskId, ContainerHandle> {
        &self.running_tasks
    }

    pub fn finished_tasks(&self) -> &HashSet<TaskId> {
        &self.finished_tasks
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn completed_tasks(&self) -> u32 {
        self.completed_tasks
    }

    pub fn failed_containers(&self) -> u32 {
        self.failed_containers
    }

    pub fn released_containers(&self) -> u32 {
        self.released_containers
    }

    pub fn too_many_failed_containers(&self) -> bool {
        self.too_many_failed_containers
    }

    /// Pick the smallest unclaimed `TaskId`, for deterministic tests.
    pub fn peek_unclaimed(&self) -> Option<TaskId> {
        self.unclaimed_tasks.iter().min().copied()
    }

    /// Find which task, if any, a container is currently bound to.
    pub fn task_for_container(&self, container_id: &ContainerId) -> Option<TaskId> {
        self.container_owner.get(container_id).copied()
    }

    pub fn partitions_of(&self, task_id: TaskId) -> Option<&HashSet<PartitionRef>> {
        self.task_partitions.get(&task_id)
    }

    /// Move `task_id` out of `unclaimed_tasks` into `running_tasks`, bound to
    /// `container`, owning `partitions`. Consumes one outstanding request.
    ///
    /// Panics if `task_id` was not unclaimed; callers must check first
    /// (`onContainerAllocated` only calls this when `unclaimed_tasks` is
    /// non-empty).
    pub fn bind(
        &mut self,
        task_id: TaskId,
        container: ContainerHandle,
        partitions: HashSet<PartitionRef>,
    ) {
        let was_unclaimed = self.unclaimed_tasks.remove(&task_id);
        debug_assert!(was_unclaimed, "bind() called on a claimed task");
        self.container_owner.insert(container.id.clone(), task_id);
        self.running_tasks.insert(task_id, container);
        self.task_partitions.insert(task_id, partitions);
        self.needed_containers = self.needed_containers.saturating_sub(1);
    }

    /// Remove `task_id` from `running_tasks`/`task_partitions` (always done
    /// first on completion, per §4.D), returning its container handle.
    pub fn unbind(&mut self, task_id: TaskId) -> Option<ContainerHandle> {
        self.task_partitions.remove(&task_id);
        let container = self.running_tasks.remove(&task_id)?;
        self.container_owner.remove(&container.id);
        Some(container)
    }

    /// Return a previously-running task to `unclaimed_tasks` and request one
    /// replacement container.
    pub fn requeue(&mut self, task_id: TaskId) {
        self.unclaimed_tasks.insert(task_id);
        self.needed_containers += 1;
    }

    /// Record a clean (`exitStatus == 0`) completion. `task_id` may be `None`
    /// if the container had already been unbound by a release.
    ///
    /// Mirrors the source behavior from the open question in §9: the counter
    /// increments unconditionally, even without a bound task id, and is not
    /// capped at `task_count`.
    pub fn record_clean_exit(&mut self, task_id: Option<TaskId>) {
        self.completed_tasks += 1;
        if let Some(task_id) = task_id {
            self.finished_tasks.insert(task_id);
        }
        if self.finished_tasks.len() as u32 == self.task_count {
            self.status = JobStatus::Succeeded;
        }
    }

    pub fn record_release(&mut self) {
        self.released_containers += 1;
    }

    pub fn record_crash(&mut self) {
        self.failed_containers += 1;
    }

    pub fn mark_fatal(&mut self) {
        self.too_many_failed_containers = true;
        self.status = JobStatus::Failed;
    }

    /// Lifecycle-coordinator capability rejection: fail before any containers
    /// are ever requested.
    pub fn mark_rejected(&mut self) {
        self.status = JobStatus::Failed;
    }

    /// A cooperative shutdown request from the resource manager: stop the
    /// loop without declaring any outcome for the job. Leaves `status`
    /// untouched, since the cluster asking the application to stop is not by
    /// itself a success or a failure.
    pub fn request_shutdown(&mut self) {
        self.shutdown_requested = true;
    }

    pub fn should_shutdown(&self) -> bool {
        self.status != JobStatus::Undefined || self.shutdown_requested
    }

    pub fn snapshot(&self) -> JobStateSnapshot {
        JobStateSnapshot {
            task_count: self.task_count,
            unclaimed_tasks: self.unclaimed_tasks.len() as u32,
            running_tasks: self
                .running_tasks
                .iter()
                .map(|(task_id, container)| TaskContainerView {
                    task_id: task_id.to_string(),
                    container_id: container.id.to_string(),
                    node_host: container.node_host.clone(),
                    node_port: container.node_port,
                })
                .collect(),
            finished_tasks: self.finished_tasks.len() as u32,
            needed_containers: self.needed_containers,
            completed_tasks: self.completed_tasks,
            failed_containers: self.failed_containers,
            released_containers: self.released_containers,
            too_many_failed_containers: self.too_many_failed_containers,
            status: self.status,
        }
    }
}

/// Read-only, serializable view of [`JobState`], published after every event
/// for the status HTTP surface.
#[derive(Debug, Clone, Serialize)]
pub struct JobStateSnapshot {
    pub task_count: u32,
    pub unclaimed_tasks: u32,
    pub running_tasks: Vec<TaskContainerView>,
    pub finished_tasks: u32,
    pub needed_containers: u32,
    pub completed_tasks: u32,
    pub failed_containers: u32,
    pub released_containers: u32,
    pub too_many_failed_containers: bool,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskContainerView {
    pub task_id: String,
    pub container_id: String,
    pub node_host: String,
    pub node_port: u16,
}
