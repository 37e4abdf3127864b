//! Failure controller: a pure, per-task failure counter with sliding-window
//! reset, deciding whether a crash is transient or fatal.
//!
//! The question answered is not "did this task ever fail `retry_count`
//! times" but "did it fail `retry_count + 1` times with the two most recent
//! failures close together": a tight crash loop is fatal, but occasional
//! flaps spread out over time are not.

use std::collections::HashMap;

use crate::domain::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDecision {
    Retry,
    Fatal,
}

#[derive(Debug, Clone, Copy)]
struct TaskFailure {
    count: u32,
    last_failure_millis: i64,
}

/// Configured once at startup with the job's retry budget.
pub struct FailureController {
    retry_count: i32,
    retry_window_millis: i64,
    table: HashMap<TaskId, TaskFailure>,
}

impl FailureController {
    pub fn new(retry_count: i32, retry_window_millis: i64) -> Self {
        Self {
            retry_count,
            retry_window_millis,
            table: HashMap::new(),
        }
    }

    pub fn record_failure(&mut self, task_id: TaskId, now_millis: i64) -> FailureDecision {
        if self.retry_count == 0 {
            return FailureDecision::Fatal;
        }
        if self.retry_count < 0 {
            return FailureDecision::Retry;
        }

        let prev = self.table.get(&task_id).copied().unwrap_or(TaskFailure {
            count: 0,
            last_failure_millis: 0,
        });
        let new_count = prev.count + 1;

        if new_count as i32 > self.retry_count {
            if now_millis - prev.last_failure_millis < self.retry_window_millis {
                return FailureDecision::Fatal;
            }
            self.table.insert(
                task_id,
                TaskFailure {
                    count: 1,
                    last_failure_millis: now_millis,
                },
            );
            return FailureDecision::Retry;
        }

        self.table.insert(
            task_id,
            TaskFailure {
                count: new_count,
                last_failure_millis: now_millis,
            },
        );
        FailureDecision::Retry
    }

    pub fn record_success(&mut self, task_id: TaskId) {
        self.table.remove(&task_id);
    }
}
