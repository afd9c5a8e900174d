//! Models for remote compose operations, tasks, and vApp snapshots.

use caravel_common::types::{TaskId, VAppId, VmId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Handles returned by a compose call: the new vApp and the task building it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeStarted {
    /// Identifier of the vApp being composed.
    pub vapp_id: VAppId,
    /// Task to wait on before the vApp is usable.
    pub task_id: TaskId,
}

/// Status of an asynchronous remote task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Accepted but not yet scheduled.
    Queued,
    /// Scheduled, waiting to run.
    PreRunning,
    /// Running.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Error,
    /// Canceled by an operator.
    Canceled,
    /// Aborted by the endpoint.
    Aborted,
}

impl TaskStatus {
    /// Check if no further status changes can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Error | TaskStatus::Canceled | TaskStatus::Aborted
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Queued => write!(f, "queued"),
            TaskStatus::PreRunning => write!(f, "preRunning"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Success => write!(f, "success"),
            TaskStatus::Error => write!(f, "error"),
            TaskStatus::Canceled => write!(f, "canceled"),
            TaskStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// A remote asynchronous task, as last observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTask {
    /// Task identifier.
    pub id: TaskId,
    /// Last observed status.
    pub status: TaskStatus,
    /// Error text; set only when the task failed.
    pub error_message: Option<String>,
}

impl RemoteTask {
    /// A task that reached [`TaskStatus::Success`].
    pub fn succeeded(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::Success,
            error_message: None,
        }
    }

    /// A task that reached [`TaskStatus::Error`] with the given message.
    pub fn failed(id: TaskId, message: impl Into<String>) -> Self {
        Self {
            id,
            status: TaskStatus::Error,
            error_message: Some(message.into()),
        }
    }

    /// The error text of a failed task.
    ///
    /// Empty messages count as absent, so a `Some` return always carries
    /// something worth surfacing to the user.
    pub fn failure_message(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Read-only snapshot of a vApp, fetched after a task completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VApp {
    /// vApp identifier.
    pub id: VAppId,
    /// vApp name as known to the endpoint.
    pub name: String,
    /// The vApp's VMs, keyed by VM name.
    pub vms: HashMap<String, VmRef>,
}

impl VApp {
    /// Look up a VM of this vApp by name.
    pub fn vm(&self, name: &str) -> Option<&VmRef> {
        self.vms.get(name)
    }
}

/// Reference to a single VM inside a vApp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRef {
    /// VM identifier.
    pub id: VmId,
}

/// Guest customization options applied to a VM after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCustomization {
    /// Whether the in-guest configuration pass runs at first boot.
    pub enabled: bool,
    /// Whether the endpoint generates an admin password for the guest.
    pub admin_password_enabled: bool,
}
