//! Waiting on remote asynchronous tasks.
//!
//! The driver owns the actual polling loop; this module only decides what a
//! terminal observation means for the provisioning flow. One observation is
//! final; there are no retries here.

use crate::driver::CloudDriver;
use crate::models::{RemoteTask, TaskStatus};
use caravel_common::types::TaskId;
use caravel_common::{Error, Result};

/// Wait for a task to reach a terminal state and return it.
///
/// The caller is expected to inspect [`RemoteTask::failure_message`];
/// use [`wait_checked`] to fold that inspection into the error type.
pub async fn wait<D: CloudDriver + ?Sized>(driver: &D, task: &TaskId) -> Result<RemoteTask> {
    tracing::debug!(task_id = %task, "waiting for remote task");
    let task = driver.wait_task_completion(task).await?;
    tracing::debug!(task_id = %task.id, status = %task.status, "remote task terminal");
    Ok(task)
}

/// Wait for a task and fail if it did not succeed.
///
/// A terminal task carrying an error message aborts the provisioning step
/// with that message; a task that ended in a non-success terminal state
/// without a message gets a fixed diagnostic instead.
pub async fn wait_checked<D: CloudDriver + ?Sized>(
    driver: &D,
    task: &TaskId,
) -> Result<RemoteTask> {
    let task = wait(driver, task).await?;
    if let Some(message) = task.failure_message() {
        return Err(Error::ComposeVApp(message.to_string()));
    }
    if task.status.is_terminal() && task.status != TaskStatus::Success {
        return Err(Error::ComposeVApp(format!(
            "task {} ended as {} without an error message",
            task.id, task.status
        )));
    }
    Ok(task)
}
