//! Spawns local processes for interactive sessions.

use crate::core::domain::{error::ProxmoxResult, model::ssh::SshCommand, port::CommandExecutor};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Executes commands as child processes with stdin, stdout and stderr inherited.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn run(&self, command: &SshCommand) -> ProxmoxResult<i32> {
        debug!(program = %command.program, args = ?command.args, "Spawning process");
        let status = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        Ok(status.code().unwrap_or(-1))
    }
}
