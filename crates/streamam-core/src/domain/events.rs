//! Events fed to the event loop: resource-manager callbacks plus the
//! internally-generated heartbeat tick.

use super::container::ContainerHandle;
use super::ids::ContainerId;

/// The exit status of a completed container.
///
/// `-100` is the cluster's reserved code for "released or lost the container
/// through no fault of the worker" (preemption, node failure, administrative
/// release); it is distinguished from both a clean exit and a worker crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus(pub i32);

impl ExitStatus {
    pub const CLEAN: ExitStatus = ExitStatus(0);
    pub const RELEASED: ExitStatus = ExitStatus(-100);

    pub fn is_clean(self) -> bool {
        self.0 == 0
    }

    pub fn is_released(self) -> bool {
        self.0 == -100
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerCompletion {
    pub container_id: ContainerId,
    pub exit_status: ExitStatus,
}

/// Asynchronous events emitted by the resource-manager client.
#[derive(Debug, Clone)]
pub enum RmEvent {
    Allocated(ContainerHandle),
    Completed(ContainerCompletion),
    Released(ContainerId),
    Reboot,
    ShutdownRequest,
}

/// Everything the event loop's dispatcher can see on its channel: a
/// resource-manager event, or the periodic heartbeat tick.
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Rm(RmEvent),
    Heartbeat,
}
