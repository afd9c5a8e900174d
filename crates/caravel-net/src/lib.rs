//! vApp network planning for the Caravel provisioning core.
//!
//! This crate turns the provider's network settings into a concrete
//! [`NetworkPlan`]: either a NAT-routed plan with a gateway, netmask, and
//! static address pool computed from a subnet (or fixed defaults), or a
//! bridged plan that attaches the vApp directly to a parent network.
//!
//! Planning is pure computation; nothing here talks to the cloud endpoint.

pub mod models;
pub mod planner;

// Re-export main types
pub use models::{FenceMode, IpAllocationMode, NetworkPlan, VAPP_NET_NAME};
pub use planner::plan;
