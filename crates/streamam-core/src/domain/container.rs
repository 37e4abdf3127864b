//! Container handles and resource capabilities granted by the cluster.

use std::fmt;

use super::ids::ContainerId;

/// Memory/CPU capability, either requested or granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceCapability {
    pub memory_mb: u32,
    pub cpu_cores: u32,
}

impl ResourceCapability {
    pub fn new(memory_mb: u32, cpu_cores: u32) -> Self {
        Self {
            memory_mb,
            cpu_cores,
        }
    }

    /// Whether this capability satisfies a required one in both dimensions.
    pub fn satisfies(&self, required: ResourceCapability) -> bool {
        self.memory_mb >= required.memory_mb && self.cpu_cores >= required.cpu_cores
    }
}

/// A container handle as granted by the resource manager.
///
/// Opaque except for equality and logging; the core does not reach into the
/// node beyond what is needed to launch a worker and log its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub id: ContainerId,
    pub node_host: String,
    pub node_port: u16,
    pub capability: ResourceCapability,
}

impl ContainerHandle {
    pub fn new(
        id: ContainerId,
        node_host: impl Into<String>,
        node_port: u16,
        capability: ResourceCapability,
    ) -> Self {
        Self {
            id,
            node_host: node_host.into(),
            node_port,
            capability,
        }
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.id, self.node_host, self.node_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_satisfies_checks_both_dimensions() {
        let granted = ResourceCapability::new(1024, 2);
        assert!(granted.satisfies(ResourceCapability::new(1024, 2)));
        assert!(granted.satisfies(ResourceCapability::new(512, 1)));
        assert!(!granted.satisfies(ResourceCapability::new(2048, 2)));
        assert!(!granted.satisfies(ResourceCapability::new(1024, 4)));
    }
}
