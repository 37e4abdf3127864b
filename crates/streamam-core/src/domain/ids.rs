//! Strongly-typed identifiers.
//!
//! Newtypes prevent mixing a `TaskId` with a raw `u32` or with a `ContainerId`
//! by mistake; both wrap distinct primitive spaces.

use std::fmt;

/// Identifier of a task group, dense in `[0, task_count)` for the job's lifetime.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

impl TaskId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Opaque container identifier as handed out by the resource manager.
///
/// The core never interprets this beyond equality and logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let task = TaskId::new(3);
        let container = ContainerId::new("container_1");

        assert_eq!(task.get(), 3);
        assert_eq!(container.as_str(), "container_1");
        assert_eq!(task.to_string(), "task-3");
        assert_eq!(container.to_string(), "container_1");
    }
}
