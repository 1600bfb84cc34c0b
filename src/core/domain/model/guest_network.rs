//! Guest network interface listings.
//!
//! VMs report interfaces through the QEMU guest agent
//! (`/nodes/{node}/qemu/{vmid}/agent/network-get-interfaces`), containers
//! through `/nodes/{node}/lxc/{vmid}/interfaces`. Both are normalized into
//! [`GuestInterface`].

use serde::Deserialize;

/// A guest network interface with its IPv4 addresses (no prefix length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestInterface {
    pub name: String,
    pub ipv4_addresses: Vec<String>,
}

impl GuestInterface {
    /// Loopback filter: any interface whose name contains "lo", case-insensitively.
    pub fn is_loopback(&self) -> bool {
        self.name.to_ascii_lowercase().contains("lo")
    }
}

/// Returns the first IPv4 address of the first non-loopback interface that has one.
pub fn first_ipv4(interfaces: &[GuestInterface]) -> Option<String> {
    interfaces
        .iter()
        .filter(|iface| !iface.is_loopback())
        .find_map(|iface| iface.ipv4_addresses.first().cloned())
}

/// `data` payload of the QEMU agent `network-get-interfaces` call.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentNetworkResponse {
    #[serde(default)]
    pub result: Vec<AgentInterface>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentInterface {
    pub name: String,
    #[serde(default, rename = "ip-addresses")]
    pub ip_addresses: Vec<AgentIpAddress>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentIpAddress {
    #[serde(rename = "ip-address-type")]
    pub address_type: String,
    #[serde(rename = "ip-address")]
    pub address: String,
}

impl From<AgentInterface> for GuestInterface {
    fn from(raw: AgentInterface) -> Self {
        Self {
            name: raw.name,
            ipv4_addresses: raw
                .ip_addresses
                .into_iter()
                .filter(|ip| ip.address_type.eq_ignore_ascii_case("ipv4"))
                .map(|ip| ip.address)
                .collect(),
        }
    }
}

/// One entry of the LXC `interfaces` call; `inet` is CIDR notation.
#[derive(Debug, Clone, Deserialize)]
pub struct LxcInterface {
    pub name: String,
    #[serde(default)]
    pub inet: Option<String>,
}

impl From<LxcInterface> for GuestInterface {
    fn from(raw: LxcInterface) -> Self {
        let ipv4_addresses = raw
            .inet
            .as_deref()
            .map(|cidr| cidr.split('/').next().unwrap_or(cidr).to_string())
            .filter(|ip| !ip.is_empty())
            .into_iter()
            .collect();
        Self {
            name: raw.name,
            ipv4_addresses,
        }
    }
}
