//! Crate-wide error taxonomy.
//!
//! Per the error handling design, only config and capability-rejection errors
//! ever propagate out of the event loop; everything else is converted into a
//! [`crate::domain::job_state::JobStatus`] transition or a shutdown signal and
//! only surfaces through logging.

use thiserror::Error;

use super::ids::TaskId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("capability rejected: cluster grants at most {granted:?}, job requires {required:?}")]
    CapabilityRejected {
        granted: super::container::ResourceCapability,
        required: super::container::ResourceCapability,
    },

    #[error("resource manager rejected the reboot-recovery path; restart the application master")]
    Reboot,

    #[error("resource manager call failed: {0}")]
    ResourceManager(String),

    #[error("node manager call failed for {task_id}: {source}")]
    NodeManager { task_id: TaskId, source: String },

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}
