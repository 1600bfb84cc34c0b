use crate::core::domain::{error::ProxmoxResult, model::ssh::SshCommand};
use async_trait::async_trait;

/// Runs an interactive command with the caller's terminal attached.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs `command` to completion and returns its exit code
    /// (`-1` when it was killed by a signal).
    async fn run(&self, command: &SshCommand) -> ProxmoxResult<i32>;
}
