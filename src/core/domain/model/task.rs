//! Domain models for asynchronous hypervisor tasks.

use serde::{Deserialize, Serialize};

/// Exit status the hypervisor reports for a successful task.
pub const TASK_EXIT_OK: &str = "OK";

/// Handle to a submitted asynchronous job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Opaque task id, e.g. `UPID:pve1:0000A1B2:...:qmstart:100:root@pam:`.
    pub upid: String,
    /// Node the task runs on.
    pub node: String,
}

impl Task {
    pub fn new(upid: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            upid: upid.into(),
            node: node.into(),
        }
    }
}

/// Status of a task as reported while polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Running,
    Stopped,
}

/// One snapshot from `/nodes/{node}/tasks/{upid}/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub state: TaskState,
    /// Only meaningful once `state` is `Stopped`.
    pub exit_status: Option<String>,
}

impl TaskStatus {
    pub fn running() -> Self {
        Self {
            state: TaskState::Running,
            exit_status: None,
        }
    }

    pub fn stopped(exit_status: impl Into<String>) -> Self {
        Self {
            state: TaskState::Stopped,
            exit_status: Some(exit_status.into()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TaskState::Running
    }

    pub fn is_success(&self) -> bool {
        !self.is_running() && self.exit_status.as_deref() == Some(TASK_EXIT_OK)
    }
}

impl From<TaskStatusResponse> for TaskStatus {
    fn from(raw: TaskStatusResponse) -> Self {
        let state = if raw.status == "running" {
            TaskState::Running
        } else {
            TaskState::Stopped
        };
        Self {
            state,
            exit_status: raw.exitstatus,
        }
    }
}

/// Raw task status payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskStatusResponse {
    pub status: String,
    #[serde(default)]
    pub exitstatus: Option<String>,
}
