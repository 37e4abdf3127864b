//! Trait seams for the core's four external collaborators.

pub mod command_builder;
pub mod node_manager;
pub mod resource_manager;

pub use command_builder::{CommandBuilder, CommandContext, ShellCommandBuilder};
pub use node_manager::{
    ApplicationVisibility, ArchiveType, Credentials, LaunchContext, NodeManagerClient,
    PackageResource, AM_RM_TOKEN_KEY,
};
pub use resource_manager::{ContainerRequest, ResourceManagerClient};
