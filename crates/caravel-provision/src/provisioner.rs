//! The provisioning orchestrator: compose a new vApp or recompose an
//! existing one, then reconcile the machine's VM identity.

use crate::driver::CloudDriver;
use crate::machine::MachineHandle;
use crate::models::{GuestCustomization, VApp};
use crate::report::ProgressReporter;
use crate::{naming, task};
use caravel_common::config::ProviderConfig;
use caravel_common::types::{TemplateId, VAppId, VmId};
use caravel_common::{Error, Result};
use caravel_net::NetworkPlan;
use std::collections::HashMap;

/// Which path the orchestrator took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionAction {
    /// A new vApp was composed for this machine.
    Composed,
    /// The machine was added to an already existing vApp.
    Recomposed,
}

/// Final state handed back to the next pipeline step.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// Which path was taken.
    pub action: ProvisionAction,
    /// The vApp the machine now belongs to.
    pub vapp_id: VAppId,
    /// The vApp's name on the endpoint.
    pub vapp_name: String,
    /// The machine's remote VM id.
    pub vm_id: VmId,
    /// True when the vApp network attaches directly to the parent network;
    /// downstream steps must skip edge-gateway handling.
    pub bridged_network: bool,
}

/// Drives a machine from configuration to a running VM inside a vApp.
///
/// The machine's recorded vApp id selects the path: absent means compose a
/// fresh vApp, present means recompose the existing one. The id is recorded
/// *before* the compose task is awaited, so an interrupted run resumes on
/// the recompose path instead of composing a duplicate.
///
/// Failures are surfaced immediately; nothing is rolled back. A failed run
/// may leave a partially built vApp behind for an operator to inspect.
pub struct Provisioner<'a> {
    driver: &'a dyn CloudDriver,
    reporter: &'a dyn ProgressReporter,
    config: &'a ProviderConfig,
}

impl<'a> Provisioner<'a> {
    /// Create a provisioner over injected collaborators.
    pub fn new(
        driver: &'a dyn CloudDriver,
        reporter: &'a dyn ProgressReporter,
        config: &'a ProviderConfig,
    ) -> Self {
        Self {
            driver,
            reporter,
            config,
        }
    }

    /// Provision the machine and return the reconciled outcome.
    pub async fn run(&self, machine: &mut dyn MachineHandle) -> Result<ProvisionOutcome> {
        let plan = caravel_net::plan(&self.config.network)?;

        match machine.vapp_id() {
            None => self.compose(machine, &plan).await,
            Some(vapp_id) => self.recompose(machine, vapp_id, &plan).await,
        }
    }

    async fn compose(
        &self,
        machine: &mut dyn MachineHandle,
        plan: &NetworkPlan,
    ) -> Result<ProvisionOutcome> {
        self.reporter.info("Building vApp...");

        let name = naming::vapp_name(self.config.vapp_prefix.as_deref());
        let description = naming::vapp_description();
        let vms = self.template_map(machine.name())?;

        tracing::debug!(vapp_name = %name, vdc = %self.config.vdc_id, "composing vApp");
        let started = self
            .driver
            .compose_vapp(&self.config.vdc_id, &name, &description, &vms, plan)
            .await?;

        // Record the vApp id before waiting. If the wait never returns, the
        // next run finds the id and recomposes instead of duplicating.
        machine.set_vapp_id(started.vapp_id.clone())?;

        task::wait_checked(self.driver, &started.task_id).await?;

        let vapp = match self.driver.get_vapp(&started.vapp_id).await? {
            Some(vapp) => vapp,
            None => {
                self.reporter.error("vApp creation failed");
                return Err(Error::ComposeVApp(
                    "vApp created but cannot get a working id, please report this error"
                        .to_string(),
                ));
            }
        };

        self.reporter
            .success(&format!("vApp '{}' successfully created", vapp.name));

        let vm_id = self.vm_in(&vapp, machine.name())?;
        machine.set_vm_id(vm_id.clone())?;

        self.customize_guest(&vm_id, machine.name(), &vapp.name).await?;

        Ok(ProvisionOutcome {
            action: ProvisionAction::Composed,
            vapp_id: started.vapp_id,
            vapp_name: vapp.name,
            vm_id,
            bridged_network: plan.is_bridged(),
        })
    }

    async fn recompose(
        &self,
        machine: &mut dyn MachineHandle,
        vapp_id: VAppId,
        plan: &NetworkPlan,
    ) -> Result<ProvisionOutcome> {
        self.reporter.info("Adding VM to existing vApp...");

        let vms = self.template_map(machine.name())?;

        tracing::debug!(vapp_id = %vapp_id, vm = %machine.name(), "recomposing vApp");
        let task_id = self.driver.recompose_vapp(&vapp_id, &vms, plan).await?;

        task::wait_checked(self.driver, &task_id).await?;

        let vapp = match self.driver.get_vapp(&vapp_id).await? {
            Some(vapp) => vapp,
            None => {
                self.reporter
                    .error(&format!("adding VM '{}' to the vApp failed", machine.name()));
                return Err(Error::ComposeVApp(
                    "VM added to vApp but cannot get a working id, please report this error"
                        .to_string(),
                ));
            }
        };

        let vm_id = self.vm_in(&vapp, machine.name())?;
        machine.set_vm_id(vm_id.clone())?;

        self.customize_guest(&vm_id, machine.name(), &vapp.name).await?;

        Ok(ProvisionOutcome {
            action: ProvisionAction::Recomposed,
            vapp_id,
            vapp_name: vapp.name,
            vm_id,
            bridged_network: plan.is_bridged(),
        })
    }

    /// The VM-name to template-id map sent with compose and recompose.
    ///
    /// Every machine is instantiated from the catalog's first-listed
    /// template.
    fn template_map(&self, machine_name: &str) -> Result<HashMap<String, TemplateId>> {
        let template = self
            .config
            .catalog
            .first_template()
            .ok_or_else(|| Error::InvalidConfig("catalog lists no templates".to_string()))?;
        Ok(HashMap::from([(
            machine_name.to_string(),
            template.id.clone(),
        )]))
    }

    fn vm_in(&self, vapp: &VApp, vm_name: &str) -> Result<VmId> {
        vapp.vm(vm_name)
            .map(|vm| vm.id.clone())
            .ok_or_else(|| Error::VmNotFound {
                vm_name: vm_name.to_string(),
                vapp_name: vapp.name.clone(),
            })
    }

    async fn customize_guest(&self, vm_id: &VmId, vm_name: &str, vapp_name: &str) -> Result<()> {
        tracing::info!(vm = %vm_name, vapp = %vapp_name, "setting guest customization");

        let options = GuestCustomization {
            enabled: true,
            admin_password_enabled: false,
        };
        let task_id = self
            .driver
            .set_vm_guest_customization(vm_id, vm_name, &options)
            .await?;
        task::wait_checked(self.driver, &task_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::MachineRecord;
    use crate::models::{ComposeStarted, RemoteTask, VmRef};
    use async_trait::async_trait;
    use caravel_common::config::{CatalogConfig, CatalogTemplate, NetworkSettings};
    use caravel_common::types::{NetworkId, TaskId, VdcId};
    use std::sync::Mutex;

    /// Recording driver: every call appends to `calls`, results are canned.
    #[derive(Default)]
    struct MockDriver {
        calls: Mutex<Vec<String>>,
        fail_compose_task: bool,
        missing_vapp: bool,
        omit_vm: bool,
    }

    impl MockDriver {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn vapp(&self, id: &VAppId, vm_name: &str) -> VApp {
            let mut vms = HashMap::new();
            if !self.omit_vm {
                vms.insert(vm_name.to_string(), VmRef { id: VmId::new("vm-1") });
            }
            VApp {
                id: id.clone(),
                name: "Caravel-alice-buildbox-00c0ffee".to_string(),
                vms,
            }
        }
    }

    #[async_trait]
    impl CloudDriver for MockDriver {
        async fn compose_vapp(
            &self,
            _vdc: &VdcId,
            name: &str,
            _description: &str,
            vms: &HashMap<String, TemplateId>,
            _network: &NetworkPlan,
        ) -> Result<ComposeStarted> {
            self.record(format!("compose:{}", name));
            assert_eq!(vms.len(), 1);
            Ok(ComposeStarted {
                vapp_id: VAppId::new("vapp-1"),
                task_id: TaskId::new("task-compose"),
            })
        }

        async fn recompose_vapp(
            &self,
            vapp: &VAppId,
            vms: &HashMap<String, TemplateId>,
            _network: &NetworkPlan,
        ) -> Result<TaskId> {
            self.record(format!("recompose:{}", vapp));
            assert_eq!(vms.len(), 1);
            Ok(TaskId::new("task-recompose"))
        }

        async fn get_vapp(&self, vapp: &VAppId) -> Result<Option<VApp>> {
            self.record(format!("get:{}", vapp));
            if self.missing_vapp {
                return Ok(None);
            }
            Ok(Some(self.vapp(vapp, "web-1")))
        }

        async fn wait_task_completion(&self, task: &TaskId) -> Result<RemoteTask> {
            self.record(format!("wait:{}", task));
            if self.fail_compose_task && task.as_str() == "task-compose" {
                return Ok(RemoteTask::failed(task.clone(), "simulated quota failure"));
            }
            Ok(RemoteTask::succeeded(task.clone()))
        }

        async fn set_vm_guest_customization(
            &self,
            _vm: &VmId,
            vm_name: &str,
            options: &GuestCustomization,
        ) -> Result<TaskId> {
            self.record(format!("customize:{}", vm_name));
            assert!(options.enabled);
            assert!(!options.admin_password_enabled);
            Ok(TaskId::new("task-customize"))
        }
    }

    struct NullReporter;

    impl ProgressReporter for NullReporter {
        fn info(&self, _message: &str) {}
        fn success(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    fn config() -> ProviderConfig {
        ProviderConfig {
            vdc_id: VdcId::new("vdc-1"),
            vapp_prefix: None,
            catalog: CatalogConfig {
                name: Some("golden-images".to_string()),
                templates: vec![CatalogTemplate {
                    name: "debian-12".to_string(),
                    id: TemplateId::new("template-1"),
                }],
            },
            network: NetworkSettings {
                subnet: None,
                dns: vec![],
                bridge: None,
                parent_network: NetworkId::new("net-parent"),
            },
        }
    }

    fn bridged_config() -> ProviderConfig {
        let mut cfg = config();
        cfg.network.bridge = Some(NetworkId::new("net-bridge"));
        cfg
    }

    #[tokio::test]
    async fn test_compose_path_sets_both_ids() {
        let driver = MockDriver::default();
        let cfg = config();
        let mut machine = MachineRecord::new("web-1");

        let outcome = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap();

        assert_eq!(outcome.action, ProvisionAction::Composed);
        assert_eq!(machine.vapp_id(), Some(VAppId::new("vapp-1")));
        assert_eq!(machine.vm_id(), Some(VmId::new("vm-1")));
        assert!(!outcome.bridged_network);

        let calls = driver.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls[0].starts_with("compose:"));
        assert_eq!(calls[1], "wait:task-compose");
        assert_eq!(calls[2], "get:vapp-1");
        assert_eq!(calls[3], "customize:web-1");
        assert_eq!(calls[4], "wait:task-customize");
    }

    #[tokio::test]
    async fn test_compose_uses_configured_prefix_and_unique_suffix() {
        let driver = MockDriver::default();
        let mut cfg = config();
        cfg.vapp_prefix = Some("staging".to_string());

        let mut first = MachineRecord::new("web-1");
        Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut first)
            .await
            .unwrap();
        let mut second = MachineRecord::new("web-1");
        Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut second)
            .await
            .unwrap();

        let calls = driver.calls();
        let names: Vec<&String> = calls.iter().filter(|c| c.starts_with("compose:")).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("compose:staging-"));
        // Two invocations under the same configuration still differ.
        assert_ne!(names[0], names[1]);
    }

    #[tokio::test]
    async fn test_recompose_path_never_composes() {
        let driver = MockDriver::default();
        let cfg = config();
        let mut machine = MachineRecord::with_vapp("web-1", VAppId::new("vapp-9"));

        let outcome = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap();

        assert_eq!(outcome.action, ProvisionAction::Recomposed);
        // vApp id untouched, VM id reconciled.
        assert_eq!(machine.vapp_id(), Some(VAppId::new("vapp-9")));
        assert_eq!(machine.vm_id(), Some(VmId::new("vm-1")));

        let calls = driver.calls();
        assert_eq!(calls[0], "recompose:vapp-9");
        assert!(calls.iter().all(|c| !c.starts_with("compose:")));
    }

    #[tokio::test]
    async fn test_compose_wait_failure_stops_the_flow() {
        let driver = MockDriver {
            fail_compose_task: true,
            ..MockDriver::default()
        };
        let cfg = config();
        let mut machine = MachineRecord::new("web-1");

        let err = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ComposeVApp(_)));
        assert!(err.to_string().contains("simulated quota failure"));

        // The vApp id was persisted before the wait, so a re-run recomposes.
        assert_eq!(machine.vapp_id(), Some(VAppId::new("vapp-1")));
        assert!(machine.vm_id().is_none());

        // No fetch, no customization after the failed wait.
        let calls = driver.calls();
        assert_eq!(calls.last().unwrap(), "wait:task-compose");
        assert!(calls.iter().all(|c| !c.starts_with("get:")));
        assert!(calls.iter().all(|c| !c.starts_with("customize:")));
    }

    #[tokio::test]
    async fn test_unresolvable_vapp_after_compose_fails() {
        let driver = MockDriver {
            missing_vapp: true,
            ..MockDriver::default()
        };
        let cfg = config();
        let mut machine = MachineRecord::new("web-1");

        let err = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ComposeVApp(_)));
        assert!(err.to_string().contains("cannot get a working id"));
        assert!(machine.vm_id().is_none());
    }

    #[tokio::test]
    async fn test_vm_missing_from_vapp_map() {
        let driver = MockDriver {
            omit_vm: true,
            ..MockDriver::default()
        };
        let cfg = config();
        let mut machine = MachineRecord::new("web-1");

        let err = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::VmNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_catalog_fails_before_any_remote_call() {
        let driver = MockDriver::default();
        let mut cfg = config();
        cfg.catalog.templates.clear();
        let mut machine = MachineRecord::new("web-1");

        let err = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bridged_plan_marks_the_outcome() {
        let driver = MockDriver::default();
        let cfg = bridged_config();
        let mut machine = MachineRecord::new("web-1");

        let outcome = Provisioner::new(&driver, &NullReporter, &cfg)
            .run(&mut machine)
            .await
            .unwrap();

        assert!(outcome.bridged_network);
    }
}
