//! Stream partition references.

use std::fmt;

/// An immutable reference to one partition of one input stream.
///
/// Ordered by `(system, stream, partition_id)`, which is the sort key the
/// partition assigner (see [`crate::assign`]) relies on for determinism.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionRef {
    pub system: String,
    pub stream: String,
    pub partition_id: u32,
}

impl PartitionRef {
    pub fn new(system: impl Into<String>, stream: impl Into<String>, partition_id: u32) -> Self {
        Self {
            system: system.into(),
            stream: stream.into(),
            partition_id,
        }
    }
}

impl fmt::Display for PartitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}", self.system, self.stream, self.partition_id)
    }
}
