//! CLI entry point: wires configuration, logging, the event loop, and the
//! status HTTP surface together for local/manual exercising of the core.
//!
//! This binary never talks to a real cluster; the resource-manager and
//! node-manager clients are the in-memory doubles from
//! `streamam_core::testing`, which is the seam a real deployment would
//! replace with RPC clients speaking the cluster's wire protocol.

mod status_server;

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use streamam_core::domain::{CoreError, PartitionRef, ResourceCapability};
use streamam_core::ports::node_manager::{ApplicationVisibility, ArchiveType, Credentials, PackageResource};
use streamam_core::ports::ShellCommandBuilder;
use streamam_core::testing::{InMemoryNodeManager, InMemoryResourceManager};
use streamam_core::{CoreConfig, EventLoop, LifecycleCoordinator, SystemClock, TaskManager, TaskManagerConfig};

#[derive(Parser, Debug)]
#[command(name = "streamam", about = "Stream-processing application master task-manager core")]
struct Cli {
    /// Path to a layered config file (TOML/YAML/JSON); overridden by
    /// STREAMAM_ environment variables.
    #[arg(long)]
    config: Option<String>,

    /// Job name, used in the worker command line and environment.
    #[arg(long, default_value = "streamam-job")]
    job_name: String,

    /// Address the status HTTP surface listens on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    status_addr: SocketAddr,

    /// Number of distinct partitions to synthesize per task group, for the
    /// in-memory demo (a real deployment reads the job's actual partition
    /// catalog instead).
    #[arg(long, default_value_t = 4)]
    demo_partitions: u32,
}

fn load_config(cli: &Cli) -> Result<CoreConfig, CoreError> {
    let mut builder = Config::builder();
    if let Some(path) = &cli.config {
        builder = builder.add_source(File::with_name(path).required(false));
    }
    builder = builder.add_source(Environment::with_prefix("STREAMAM").separator("__"));
    let raw = builder
        .build()
        .map_err(|err| CoreError::Config(err.to_string()))?;

    let defaults = CoreConfig::default();
    let config = CoreConfig {
        task_count: raw.get_int("task.count").map(|v| v as u32).unwrap_or(defaults.task_count),
        container_memory_mb: raw
            .get_int("yarn.container.memory.mb")
            .map(|v| v as u32)
            .unwrap_or(defaults.container_memory_mb),
        container_cpu_cores: raw
            .get_int("yarn.container.cpu.cores")
            .map(|v| v as u32)
            .unwrap_or(defaults.container_cpu_cores),
        retry_count: raw
            .get_int("yarn.container.retry.count")
            .map(|v| v as i32)
            .unwrap_or(defaults.retry_count),
        retry_window_millis: raw
            .get_int("yarn.container.retry.window.ms")
            .unwrap_or(defaults.retry_window_millis),
        package_path: raw
            .get_string("yarn.package.path")
            .map_err(|_| CoreError::Config("yarn.package.path is required".to_string()))?,
    };
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    info!(
        task_count = config.task_count,
        container_memory_mb = config.container_memory_mb,
        "starting application master core"
    );

    let (events_tx, events_rx) = mpsc::channel(64);
    let resource_manager = Arc::new(InMemoryResourceManager::new(
        ResourceCapability::new(config.container_memory_mb * 4, config.container_cpu_cores * 4),
        events_tx,
    ));
    let node_manager = Arc::new(InMemoryNodeManager::new());

    let all_partitions: Vec<PartitionRef> = (0..cli.demo_partitions)
        .map(|i| PartitionRef::new("demo", cli.job_name.clone(), i))
        .collect();

    let task_manager = TaskManager::new(
        TaskManagerConfig {
            job_name: cli.job_name.clone(),
            container_memory_mb: config.container_memory_mb,
            container_cpu_cores: config.container_cpu_cores,
            package: PackageResource {
                url: config.package_path.clone(),
                size_bytes: 0,
                timestamp_millis: 0,
                archive_type: ArchiveType::TarGz,
                visibility: ApplicationVisibility::Application,
            },
            all_partitions,
            credentials: Credentials::default(),
        },
        resource_manager.clone(),
        node_manager,
        Arc::new(ShellCommandBuilder),
        Arc::new(SystemClock),
        config.retry_count,
        config.retry_window_millis,
    );

    let lifecycle = LifecycleCoordinator::new(
        resource_manager,
        "127.0.0.1",
        0,
        format!("http://{}/status", cli.status_addr),
        ResourceCapability::new(config.container_memory_mb, config.container_cpu_cores),
    );

    let (mut event_loop, snapshots) = EventLoop::new(
        config.task_count,
        vec![Box::new(lifecycle), Box::new(task_manager)],
        events_rx,
        Duration::from_secs(1),
    );

    let status_addr = cli.status_addr;
    let status_server = tokio::spawn(async move {
        if let Err(err) = status_server::serve(status_addr, snapshots).await {
            error!(error = %err, "status server exited");
        }
    });

    tokio::select! {
        _ = event_loop.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
        }
    }

    status_server.abort();
    ExitCode::SUCCESS
}
