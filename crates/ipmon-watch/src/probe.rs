//! Live host inspection.

use std::net::IpAddr;

use if_addrs::IfAddr;
use ipmon_core::Snapshot;
use pnet::ipnetwork::IpNetwork;

use crate::error::{Result, WatchError};

/// Source of the host's current network snapshot.
pub trait SnapshotProvider {
    fn capture(&self) -> Result<Snapshot>;
}

/// One address assigned to a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub ip: IpAddr,
    pub netmask: IpAddr,
}

/// OS queries behind [`SystemProbe`].
pub trait HostInfo {
    fn hostname(&self) -> Result<String>;

    /// Addresses of every interface, in enumeration order.
    fn interface_addresses(&self) -> Result<Vec<InterfaceAddress>>;
}

/// The running operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct Os;

impl HostInfo for Os {
    fn hostname(&self) -> Result<String> {
        sys_info::hostname().map_err(|e| WatchError::Probe(format!("hostname: {e}")))
    }

    fn interface_addresses(&self) -> Result<Vec<InterfaceAddress>> {
        let interfaces = if_addrs::get_if_addrs()
            .map_err(|e| WatchError::Probe(format!("interface addresses: {e}")))?;

        Ok(interfaces
            .into_iter()
            .map(|iface| match iface.addr {
                IfAddr::V4(v4) => InterfaceAddress {
                    ip: IpAddr::V4(v4.ip),
                    netmask: IpAddr::V4(v4.netmask),
                },
                IfAddr::V6(v6) => InterfaceAddress {
                    ip: IpAddr::V6(v6.ip),
                    netmask: IpAddr::V6(v6.netmask),
                },
            })
            .collect())
    }
}

/// Reads the hostname and the addresses of every network interface.
///
/// Fails if either one cannot be determined.
#[derive(Debug, Clone, Copy)]
pub struct SystemProbe<H = Os> {
    host: H,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self { host: Os }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HostInfo> SystemProbe<H> {
    pub fn with_host(host: H) -> Self {
        Self { host }
    }
}

impl<H: HostInfo> SnapshotProvider for SystemProbe<H> {
    fn capture(&self) -> Result<Snapshot> {
        let hostname = self.host.hostname()?;
        let addresses = render_addresses(&self.host.interface_addresses()?);

        tracing::debug!(%hostname, address_count = addresses.len(), "Captured host network");

        Ok(Snapshot::new(hostname, addresses))
    }
}

/// CIDR text for each address (`10.0.0.5/24`, `fe80::1/64`), keeping order.
///
/// A non-contiguous netmask has no prefix form; the bare address is used.
pub fn render_addresses(addresses: &[InterfaceAddress]) -> Vec<String> {
    addresses
        .iter()
        .map(|a| match IpNetwork::with_netmask(a.ip, a.netmask) {
            Ok(net) => net.to_string(),
            Err(_) => a.ip.to_string(),
        })
        .collect()
}
