//! Drives an asynchronous hypervisor task to a terminal state.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult},
    model::{
        client_config::{DEFAULT_TASK_POLL_INTERVAL, DEFAULT_TASK_TIMEOUT},
        task::Task,
    },
    port::ResourceGateway,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Polls `/nodes/{node}/tasks/{upid}/status` until the task stops or the timeout expires.
pub struct TaskPoller<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    interval: Duration,
    timeout: Duration,
}

impl<'a, G: ResourceGateway + ?Sized> TaskPoller<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self {
            gateway,
            interval: DEFAULT_TASK_POLL_INTERVAL,
            timeout: DEFAULT_TASK_TIMEOUT,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Waits for `task` to finish.
    ///
    /// # Errors
    /// * `TaskFailed` if the task stopped with an exit status other than `OK`
    /// * `Timeout` if it was still running when the timeout expired
    pub async fn wait(&self, task: &Task) -> ProxmoxResult<()> {
        let started = Instant::now();
        match tokio::time::timeout(self.timeout, self.poll_until_stopped(task)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(upid = %task.upid, elapsed_ms = started.elapsed().as_millis() as u64, "Task timed out");
                Err(ProxmoxError::Timeout {
                    upid: task.upid.clone(),
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn poll_until_stopped(&self, task: &Task) -> ProxmoxResult<()> {
        let mut tick: u32 = 0;
        loop {
            tick += 1;
            match self.gateway.task_status(task).await {
                Ok(status) if status.is_running() => {
                    debug!(upid = %task.upid, tick, "Task still running");
                }
                Ok(status) if status.is_success() => {
                    info!(upid = %task.upid, tick, "Task finished");
                    return Ok(());
                }
                Ok(status) => {
                    let exit_status = status.exit_status.unwrap_or_default();
                    warn!(upid = %task.upid, %exit_status, "Task failed");
                    return Err(ProxmoxError::TaskFailed {
                        upid: task.upid.clone(),
                        exit_status,
                    });
                }
                // The task may not be visible yet right after submission.
                Err(e) => {
                    debug!(upid = %task.upid, tick, error = %e, "Task status unavailable");
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}
