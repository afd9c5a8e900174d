//! Cloud driver trait: the remote-call surface of the provisioning core.

use crate::models::{ComposeStarted, GuestCustomization, RemoteTask, VApp};
use async_trait::async_trait;
use caravel_common::types::{TaskId, TemplateId, VAppId, VdcId, VmId};
use caravel_common::Result;
use caravel_net::NetworkPlan;
use std::collections::HashMap;

/// Trait for the remote operations the provisioning flow depends on.
///
/// This abstraction keeps the orchestrator independent of any particular
/// cloud endpoint or transport; implementations own their session,
/// connection lifecycle, and polling cadence.
#[async_trait]
pub trait CloudDriver: Send + Sync {
    /// Compose a new vApp from template VMs.
    ///
    /// # Arguments
    /// * `vdc` - Virtual datacenter to provision into
    /// * `name` - Globally unique vApp name
    /// * `description` - Human-readable vApp description
    /// * `vms` - VM names mapped to the template each is instantiated from
    /// * `network` - The vApp network plan
    ///
    /// # Returns
    /// The new vApp id together with the task building it.
    ///
    /// # Errors
    /// Returns an error if the compose request is rejected.
    async fn compose_vapp(
        &self,
        vdc: &VdcId,
        name: &str,
        description: &str,
        vms: &HashMap<String, TemplateId>,
        network: &NetworkPlan,
    ) -> Result<ComposeStarted>;

    /// Add VMs to an existing vApp.
    ///
    /// # Arguments
    /// * `vapp` - The vApp to extend
    /// * `vms` - VM names mapped to the template each is instantiated from
    /// * `network` - The vApp network plan
    ///
    /// # Returns
    /// The task performing the recomposition.
    async fn recompose_vapp(
        &self,
        vapp: &VAppId,
        vms: &HashMap<String, TemplateId>,
        network: &NetworkPlan,
    ) -> Result<TaskId>;

    /// Fetch a vApp snapshot by id.
    ///
    /// # Returns
    /// `None` when the endpoint does not know the id.
    async fn get_vapp(&self, vapp: &VAppId) -> Result<Option<VApp>>;

    /// Block until the given task reaches a terminal state.
    ///
    /// Polling cadence and backoff are internal to the implementation; the
    /// returned task is always terminal.
    async fn wait_task_completion(&self, task: &TaskId) -> Result<RemoteTask>;

    /// Apply guest customization options to a VM.
    ///
    /// # Returns
    /// The task applying the options.
    async fn set_vm_guest_customization(
        &self,
        vm: &VmId,
        vm_name: &str,
        options: &GuestCustomization,
    ) -> Result<TaskId>;
}
