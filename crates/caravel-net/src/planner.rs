//! Computes the vApp network plan from the provider's network settings.

use crate::models::{FenceMode, IpAllocationMode, NetworkPlan, VAPP_NET_NAME};
use caravel_common::config::NetworkSettings;
use caravel_common::types::NetworkId;
use caravel_common::{Error, Result};
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// DNS pair used when no DNS entries are configured.
const DEFAULT_DNS1: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);
const DEFAULT_DNS2: Ipv4Addr = Ipv4Addr::new(8, 8, 4, 4);

/// Fallback plan used when neither a subnet nor a bridge network is
/// configured.
const DEFAULT_GATEWAY: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 1);
const DEFAULT_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
const DEFAULT_POOL_START: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 2);
const DEFAULT_POOL_END: Ipv4Addr = Ipv4Addr::new(10, 1, 1, 254);

/// Smallest subnet that still yields a pool: one address each for the
/// network, the gateway, the pool, and broadcast.
const MIN_SUBNET_SIZE: u64 = 4;

/// Compute the network plan for a vApp.
///
/// Three mutually exclusive shapes, in order of precedence:
/// - a subnet is configured: NAT-routed plan with gateway, netmask, and
///   static pool computed from the CIDR block;
/// - a bridge network is configured: bridged plan attached directly to the
///   parent network, with no addressing fields;
/// - neither: NAT-routed plan with fixed `10.1.1.0/24` defaults.
///
/// # Errors
///
/// Returns [`Error::InvalidNetworkConfig`] when subnet and bridge are both
/// configured, when a subnet or DNS entry does not parse as IPv4 CIDR, or
/// when the subnet is too small to hold a pool.
pub fn plan(settings: &NetworkSettings) -> Result<NetworkPlan> {
    if settings.subnet.is_some() && settings.bridge.is_some() {
        return Err(Error::InvalidNetworkConfig(
            "subnet and bridge network are mutually exclusive".to_string(),
        ));
    }

    let (dns1, dns2) = resolve_dns(&settings.dns)?;

    if let Some(subnet) = settings.subnet.as_deref() {
        routed_plan(subnet, dns1, dns2, settings.parent_network.clone())
    } else if settings.bridge.is_some() {
        // Direct attachment to the parent network, no edge device at all.
        tracing::debug!(parent = %settings.parent_network, "planning bridged network");
        Ok(NetworkPlan {
            name: VAPP_NET_NAME.to_string(),
            fence_mode: FenceMode::Bridged,
            ip_allocation_mode: IpAllocationMode::Pool,
            gateway: None,
            netmask: None,
            start_address: None,
            end_address: None,
            dns1: None,
            dns2: None,
            parent_network: settings.parent_network.clone(),
            firewall_enabled: None,
        })
    } else {
        tracing::debug!(dns1 = %dns1, dns2 = ?dns2, "no subnet configured, using default plan");
        Ok(NetworkPlan {
            name: VAPP_NET_NAME.to_string(),
            fence_mode: FenceMode::NatRouted,
            ip_allocation_mode: IpAllocationMode::Pool,
            gateway: Some(DEFAULT_GATEWAY),
            netmask: Some(DEFAULT_NETMASK),
            start_address: Some(DEFAULT_POOL_START),
            end_address: Some(DEFAULT_POOL_END),
            dns1: Some(dns1),
            dns2,
            parent_network: settings.parent_network.clone(),
            firewall_enabled: Some(false),
        })
    }
}

/// Compute a NAT-routed plan from a subnet in CIDR form.
///
/// The network address is excluded, the first usable address becomes the
/// gateway, and the pool spans the second usable address through the
/// address immediately below broadcast.
fn routed_plan(
    subnet: &str,
    dns1: Ipv4Addr,
    dns2: Option<Ipv4Addr>,
    parent_network: NetworkId,
) -> Result<NetworkPlan> {
    let cidr: Ipv4Network = subnet.parse().map_err(|e| {
        Error::InvalidNetworkConfig(format!("malformed subnet '{subnet}': {e}"))
    })?;

    let size = 1u64 << (32 - cidr.prefix());
    if size < MIN_SUBNET_SIZE {
        return Err(Error::InvalidNetworkConfig(format!(
            "subnet '{subnet}' holds {size} address(es) but at least {MIN_SUBNET_SIZE} \
             are required (network, gateway, pool, broadcast)"
        )));
    }

    let base = u64::from(u32::from(cidr.network()));
    let gateway = Ipv4Addr::from((base + 1) as u32);
    let start_address = Ipv4Addr::from((base + 2) as u32);
    // Broadcast is the last address of the block; the pool stops just short.
    let end_address = Ipv4Addr::from((base + size - 2) as u32);

    tracing::debug!(
        subnet = %cidr,
        gateway = %gateway,
        netmask = %cidr.mask(),
        pool_start = %start_address,
        pool_end = %end_address,
        "computed routed network plan"
    );

    Ok(NetworkPlan {
        name: VAPP_NET_NAME.to_string(),
        fence_mode: FenceMode::NatRouted,
        ip_allocation_mode: IpAllocationMode::Pool,
        gateway: Some(gateway),
        netmask: Some(cidr.mask()),
        start_address: Some(start_address),
        end_address: Some(end_address),
        dns1: Some(dns1),
        dns2,
        parent_network,
        firewall_enabled: Some(false),
    })
}

/// Resolve the DNS pair from the configured entry list.
///
/// An empty list falls back to the fixed public pair. Otherwise the first
/// entry becomes the primary and the second, if present, the secondary;
/// further entries are ignored. Entries are CIDR strings (a bare address
/// parses as a /32) normalized to their network base address.
fn resolve_dns(entries: &[String]) -> Result<(Ipv4Addr, Option<Ipv4Addr>)> {
    if entries.is_empty() {
        return Ok((DEFAULT_DNS1, Some(DEFAULT_DNS2)));
    }

    let dns1 = dns_base(&entries[0])?;
    let dns2 = entries.get(1).map(|e| dns_base(e)).transpose()?;
    Ok((dns1, dns2))
}

fn dns_base(entry: &str) -> Result<Ipv4Addr> {
    let cidr: Ipv4Network = entry.parse().map_err(|e| {
        Error::InvalidNetworkConfig(format!("malformed DNS entry '{entry}': {e}"))
    })?;
    Ok(cidr.network())
}
