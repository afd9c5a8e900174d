//! Machine handle: the durable identity provisioning reads and mutates.

use caravel_common::types::{VAppId, VmId};
use caravel_common::Result;
use serde::{Deserialize, Serialize};

/// The caller-owned machine state this core anchors on.
///
/// `vapp_id` and `vm_id` must survive across invocations: a recorded vApp
/// id is what routes a later run to the recompose path instead of creating
/// a duplicate vApp. Implementations decide where the state lives (a state
/// file, a database row); the setters are fallible so persistence errors
/// surface immediately.
pub trait MachineHandle: Send {
    /// The machine's name; also its VM name inside the vApp.
    fn name(&self) -> &str;

    /// The vApp this machine belongs to, if one was ever composed.
    fn vapp_id(&self) -> Option<VAppId>;

    /// Record the vApp id. Called before the compose task is awaited.
    fn set_vapp_id(&mut self, id: VAppId) -> Result<()>;

    /// The machine's remote VM id, once known.
    fn vm_id(&self) -> Option<VmId>;

    /// Record the remote VM id after a successful compose or recompose.
    fn set_vm_id(&mut self, id: VmId) -> Result<()>;
}

/// In-memory [`MachineHandle`] implementation.
///
/// Serializable, so embedders can persist it between invocations however
/// they like. Also what the tests provision against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineRecord {
    name: String,
    vapp_id: Option<VAppId>,
    vm_id: Option<VmId>,
}

impl MachineRecord {
    /// Create a record for a machine that has never been provisioned.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vapp_id: None,
            vm_id: None,
        }
    }

    /// Create a record for a machine already tied to a vApp.
    pub fn with_vapp(name: impl Into<String>, vapp_id: VAppId) -> Self {
        Self {
            name: name.into(),
            vapp_id: Some(vapp_id),
            vm_id: None,
        }
    }
}

impl MachineHandle for MachineRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn vapp_id(&self) -> Option<VAppId> {
        self.vapp_id.clone()
    }

    fn set_vapp_id(&mut self, id: VAppId) -> Result<()> {
        self.vapp_id = Some(id);
        Ok(())
    }

    fn vm_id(&self) -> Option<VmId> {
        self.vm_id.clone()
    }

    fn set_vm_id(&mut self, id: VmId) -> Result<()> {
        self.vm_id = Some(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unprovisioned() {
        let record = MachineRecord::new("web-1");
        assert_eq!(record.name(), "web-1");
        assert!(record.vapp_id().is_none());
        assert!(record.vm_id().is_none());
    }

    #[test]
    fn test_record_round_trips_ids() {
        let mut record = MachineRecord::new("web-1");
        record.set_vapp_id(VAppId::new("vapp-1")).unwrap();
        record.set_vm_id(VmId::new("vm-1")).unwrap();
        assert_eq!(record.vapp_id(), Some(VAppId::new("vapp-1")));
        assert_eq!(record.vm_id(), Some(VmId::new("vm-1")));
    }

    #[test]
    fn test_with_vapp_routes_to_recompose() {
        let record = MachineRecord::with_vapp("web-2", VAppId::new("vapp-9"));
        assert_eq!(record.vapp_id(), Some(VAppId::new("vapp-9")));
        assert!(record.vm_id().is_none());
    }
}
