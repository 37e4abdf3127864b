//! Partition assigner: a pure function from `(task_id, task_count, all
//! partitions)` to the subset of partitions that task owns.
//!
//! Deterministic and stable under reordering of the input: partitions are
//! sorted by `(system, stream, partition_id)` first, then handed out
//! round-robin so task `k` owns every partition whose sorted index satisfies
//! `index % task_count == k`.

use std::collections::HashSet;

use crate::domain::{PartitionRef, TaskId};

pub fn assign(task_id: TaskId, task_count: u32, all_partitions: &[PartitionRef]) -> HashSet<PartitionRef> {
    assert!(task_count > 0, "task_count must be positive");

    let mut sorted: Vec<&PartitionRef> = all_partitions.iter().collect();
    sorted.sort();

    sorted
        .into_iter()
        .enumerate()
        .filter(|(index, _)| *index as u32 % task_count == task_id.get())
        .map(|(_, partition)| partition.clone())
        .collect()
}
