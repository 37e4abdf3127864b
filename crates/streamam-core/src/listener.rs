//! The listener capability set: every participant in the event loop's
//! fan-out implements this trait. Registration order matters (see
//! [`crate::event_loop::EventLoop`]): the lifecycle coordinator is
//! registered before the task manager so a capability rejection short-circuits
//! container requests.

use async_trait::async_trait;

use crate::domain::{ContainerHandle, ContainerId, CoreError, ExitStatus, JobState};

/// Default method bodies are no-ops; a listener overrides only the callbacks
/// it cares about.
#[async_trait]
pub trait Listener: Send + Sync {
    async fn on_init(&mut self, _state: &mut JobState) -> Result<(), CoreError> {
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

    async fn on_container_released(
        &mut self,
        _state: &mut JobState,
        _container_id: ContainerId,
    ) -> Result<(), CoreError> {
        Ok(())
    }

    async fn on_reboot(&mut self, _state: &mut JobState) -> Result<(), CoreError> {
        Ok(())
    }

    async fn on_shutdown(&mut self, _state: &mut JobState) -> Result<(), CoreError> {
        Ok(())
    }

    async fn on_heartbeat(&mut self, _state: &mut JobState) -> Result<(), CoreError> {
        Ok(())
    }
}
