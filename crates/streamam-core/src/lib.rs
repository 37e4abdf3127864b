//! Task-manager core of a stream-processing application master.
//!
//! Negotiates containers from a generic cluster resource manager, launches
//! one worker per task group, and decides under a bounded retry policy when
//! to request replacements, release surplus allocations, or terminate the
//! job. See [`event_loop::EventLoop`] for the single-writer dispatcher that
//! ties the pieces together, and [`domain::job_state::JobState`] for the data
//! model.

pub mod assign;
pub mod clock;
pub mod config;
pub mod domain;
pub mod event_loop;
pub mod failure;
pub mod lifecycle;
pub mod listener;
pub mod ports;
pub mod task_manager;
pub mod testing;

pub use assign::assign;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoreConfig;
pub use domain::{CoreError, JobState, JobStateSnapshot, JobStatus};
pub use event_loop::EventLoop;
pub use failure::{FailureController, FailureDecision};
pub use lifecycle::LifecycleCoordinator;
pub use listener::Listener;
pub use task_manager::{TaskManager, TaskManagerConfig};
