//! Progress reporting: one-way notifications toward the user.

use crate::provisioner::ProvisionOutcome;
use caravel_common::Result;

/// One-way notification sink for user-facing progress messages.
///
/// Nothing is read back from the sink; dropping messages is harmless to the
/// provisioning flow itself.
pub trait ProgressReporter: Send + Sync {
    /// An informational message before a remote phase starts.
    fn info(&self, message: &str);
    /// A success message after a phase completes.
    fn success(&self, message: &str);
    /// A descriptive error message on a failure path.
    fn error(&self, message: &str);
}

/// Reporter that forwards notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn success(&self, message: &str) {
        tracing::info!(outcome = "success", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Map a finished provisioning result onto the reporter.
///
/// The orchestrator already reports per-phase progress; this is the final
/// one-line verdict the pipeline shows when the step ends.
pub fn report_result(reporter: &dyn ProgressReporter, result: &Result<ProvisionOutcome>) {
    match result {
        Ok(outcome) => reporter.success(&format!(
            "machine is running as VM {} in vApp '{}'",
            outcome.vm_id, outcome.vapp_name
        )),
        Err(err) => reporter.error(&err.to_string()),
    }
}
