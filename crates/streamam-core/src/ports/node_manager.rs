//! Node-manager client port: synchronous (from the dispatcher's point of
//! view, awaited but short) container launch.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{ContainerHandle, CoreError};

/// The key under which the application-master ↔ resource-manager token is
/// stored; stripped by [`Credentials::sanitized_for_worker`] before a launch
/// context ever reaches a container.
pub const AM_RM_TOKEN_KEY: &str = "AM_RM_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
    Tar,
    TarGz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationVisibility {
    Public,
    Private,
    Application,
}

/// The job's deployable package, localized onto the container's node before
/// the command line runs.
#[derive(Debug, Clone)]
pub struct PackageResource {
    pub url: String,
    pub size_bytes: u64,
    pub timestamp_millis: i64,
    pub archive_type: ArchiveType,
    pub visibility: ApplicationVisibility,
}

/// A credentials blob carried to the node manager for container launch.
///
/// Construct once from whatever the resource manager handed the application
/// master, then derive the worker-facing copy with
/// [`sanitized_for_worker`](Credentials::sanitized_for_worker); never ship
/// the raw blob to a container.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    tokens: HashMap<String, String>,
}

impl Credentials {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &HashMap<String, String> {
        &self.tokens
    }

    /// Build the copy handed to a worker container: every token except the
    /// AM↔RM token. Built exactly once per container launch.
    pub fn sanitized_for_worker(&self) -> Credentials {
        let mut tokens = self.tokens.clone();
        tokens.remove(AM_RM_TOKEN_KEY);
        Credentials { tokens }
    }
}

#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub package: PackageResource,
    pub environment: HashMap<String, String>,
    pub command: Vec<String>,
    pub credentials: Credentials,
}

#[async_trait]
pub trait NodeManagerClient: Send + Sync {
    async fn start_container(
        &self,
        container: &ContainerHandle,
        launch_context: LaunchContext,
    ) -> Result<(), CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_credentials_strip_only_the_am_rm_token() {
        let mut tokens = HashMap::new();
        tokens.insert(AM_RM_TOKEN_KEY.to_string(), "secret".to_string());
        tokens.insert("HDFS_DELEGATION_TOKEN".to_string(), "keep-me".to_string());
        let raw = Credentials::new(tokens);

        let sanitized = raw.sanitized_for_worker();
        assert!(!sanitized.tokens().contains_key(AM_RM_TOKEN_KEY));
        assert_eq!(
            sanitized.tokens().get("HDFS_DELEGATION_TOKEN").map(String::as_str),
            Some("keep-me")
        );
        // The original is untouched; the sanitized copy is a fresh value.
        assert!(raw.tokens().contains_key(AM_RM_TOKEN_KEY));
    }
}
