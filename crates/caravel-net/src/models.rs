//! Models for the vApp network plan.

use caravel_common::types::NetworkId;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Name assigned to the vApp-private network in every plan.
pub const VAPP_NET_NAME: &str = "Caravel-vApp-Net";

/// Network isolation strategy for the vApp network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FenceMode {
    /// Behind a NAT/firewall edge device.
    NatRouted,
    /// Directly attached to the parent network.
    Bridged,
    /// No connection to the parent network.
    Isolated,
}

/// How VMs on the network obtain their addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IpAllocationMode {
    /// Handed out from a static address pool.
    Pool,
    /// Leased by the network's DHCP service.
    Dhcp,
    /// Assigned explicitly per VM.
    Manual,
}

/// Concrete network plan handed to the cloud driver when composing or
/// recomposing a vApp.
///
/// In [`FenceMode::NatRouted`] the gateway is the first usable address of
/// the subnet and the pool excludes the network and broadcast addresses,
/// so `gateway < start_address <= end_address < broadcast` always holds.
/// In [`FenceMode::Bridged`] only `name`, `fence_mode`,
/// `ip_allocation_mode`, and `parent_network` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkPlan {
    /// Network name inside the vApp.
    pub name: String,
    /// Isolation strategy.
    pub fence_mode: FenceMode,
    /// Address allocation mode.
    pub ip_allocation_mode: IpAllocationMode,
    /// First usable address of the subnet.
    pub gateway: Option<Ipv4Addr>,
    /// Subnet mask derived from the CIDR prefix.
    pub netmask: Option<Ipv4Addr>,
    /// First address of the static pool.
    pub start_address: Option<Ipv4Addr>,
    /// Last address of the static pool.
    pub end_address: Option<Ipv4Addr>,
    /// Primary DNS host.
    pub dns1: Option<Ipv4Addr>,
    /// Secondary DNS host.
    pub dns2: Option<Ipv4Addr>,
    /// Parent organization network the vApp network connects through.
    pub parent_network: NetworkId,
    /// Whether the edge firewall is enabled.
    pub firewall_enabled: Option<bool>,
}

impl NetworkPlan {
    /// Check whether this plan attaches directly to the parent network.
    ///
    /// Downstream steps skip edge-gateway handling for bridged plans.
    pub fn is_bridged(&self) -> bool {
        self.fence_mode == FenceMode::Bridged
    }
}
