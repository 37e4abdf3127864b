//! Command-builder port: turns a task's name and partition assignment into
//! the worker's command line and environment.
//!
//! The original interface is a fluent `setConfig(...).setName(...)
//! .setStreamPartitions(...).buildCommand()`; a pluggable `Box<dyn
//! CommandBuilder>` holding `&mut self` setter state does not borrow cleanly
//! across an `Arc<dyn ...>` shared between tasks. Collecting the same inputs
//! into one immutable [`CommandContext`] and building from `&self` keeps the
//! pluggability (configuration still selects the implementation) without the
//! interior-mutability workaround; see DESIGN.md.

use std::collections::HashMap;

use crate::domain::{PartitionRef, TaskId};

#[derive(Debug, Clone)]
pub struct CommandContext {
    pub job_name: String,
    pub task_id: TaskId,
    pub stream_partitions: Vec<PartitionRef>,
    pub package_path: String,
    pub log_dir: String,
}

pub trait CommandBuilder: Send + Sync {
    fn build_command(&self, ctx: &CommandContext) -> Vec<String>;
    fn build_environment(&self, ctx: &CommandContext) -> HashMap<String, String>;
}

/// The built-in shell command builder: invokes the job's entry point with
/// stdout/stderr redirected into the container's log directory.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandBuilder;

impl CommandBuilder for ShellCommandBuilder {
    fn build_command(&self, ctx: &CommandContext) -> Vec<String> {
        let invocation = format!(
            "exec ./run-task.sh --task-id={} --package={}",
            ctx.task_id.get(),
            shell_escape(&ctx.package_path),
        );
        let redirected = format!(
            "{invocation} 1>{log_dir}/stdout.log 2>{log_dir}/stderr.log",
            log_dir = ctx.log_dir,
        );
        vec!["/bin/bash".to_string(), "-c".to_string(), redirected]
    }

    fn build_environment(&self, ctx: &CommandContext) -> HashMap<String, String> {
        let partitions = ctx
            .stream_partitions
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut env = HashMap::new();
        env.insert("STREAMAM_JOB_NAME".to_string(), shell_escape(&ctx.job_name));
        env.insert("STREAMAM_TASK_ID".to_string(), ctx.task_id.get().to_string());
        env.insert("STREAMAM_STREAM_PARTITIONS".to_string(), shell_escape(&partitions));
        env
    }
}

/// Escape a value per the node manager's shell rules: wrap in single quotes,
/// escaping any embedded single quote as `'\''`.
fn shell_escape(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CommandContext {
        CommandContext {
            job_name: "orders-join".to_string(),
            task_id: TaskId::new(2),
            stream_partitions: vec![PartitionRef::new("kafka", "orders", 0)],
            package_path: "hdfs://cluster/packages/orders-join.tgz".to_string(),
            log_dir: "<LOG_DIR>".to_string(),
        }
    }

    #[test]
    fn shell_builder_redirects_stdout_and_stderr_into_log_dir() {
        let builder = ShellCommandBuilder;
        let command = builder.build_command(&ctx());
        let joined = command.join(" ");
        assert!(joined.contains("1><LOG_DIR>/stdout.log"));
        assert!(joined.contains("2><LOG_DIR>/stderr.log"));
        assert!(joined.contains("--task-id=2"));
    }

    #[test]
    fn shell_builder_environment_carries_partitions_and_task_id() {
        let builder = ShellCommandBuilder;
        let env = builder.build_environment(&ctx());
        assert_eq!(env.get("STREAMAM_TASK_ID").map(String::as_str), Some("2"));
        assert!(env.get("STREAMAM_STREAM_PARTITIONS").unwrap().contains("kafka.orders/0"));
    }

    #[test]
    fn shell_escape_neutralizes_embedded_quotes() {
        let escaped = shell_escape("it's a path");
        assert_eq!(escaped, r"'it'\''s a path'");
    }
}
