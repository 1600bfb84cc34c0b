//! Domain models for virtual machines and containers.
//!
//! Raw records from `/cluster/resources?type=vm` are deserialized into
//! [`ClusterResourceItem`] and immediately validated into the strongly-typed
//! [`Resource`]. The cluster listing also covers resources on offline nodes
//! (reported with status `unknown`), so it is the authoritative id set.

use crate::core::domain::{error::ValidationError, value_object::serde_helpers};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two resource families. Each uses its own API collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A QEMU virtual machine.
    Qemu,
    /// An LXC container.
    Lxc,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Qemu, ResourceKind::Lxc];

    /// Path segment of the kind's API collection.
    pub fn api_segment(self) -> &'static str {
        match self {
            ResourceKind::Qemu => "qemu",
            ResourceKind::Lxc => "lxc",
        }
    }

    /// Parses the `type` field of a cluster resource record.
    pub fn from_api_segment(segment: &str) -> Option<Self> {
        match segment {
            "qemu" => Some(ResourceKind::Qemu),
            "lxc" => Some(ResourceKind::Lxc),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Qemu => write!(f, "VM"),
            ResourceKind::Lxc => write!(f, "container"),
        }
    }
}

/// Runtime status as reported by the hypervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ResourceStatus {
    Running,
    Stopped,
    /// Any other hypervisor-defined (usually transient) state.
    Other(String),
}

impl ResourceStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, ResourceStatus::Running)
    }
}

impl From<&str> for ResourceStatus {
    fn from(value: &str) -> Self {
        match value {
            "running" => ResourceStatus::Running,
            "stopped" => ResourceStatus::Stopped,
            other => ResourceStatus::Other(other.to_string()),
        }
    }
}

impl From<ResourceStatus> for String {
    fn from(value: ResourceStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStatus::Running => write!(f, "running"),
            ResourceStatus::Stopped => write!(f, "stopped"),
            ResourceStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A virtual machine or container known to the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Cluster-wide unique identifier.
    pub vmid: u32,
    /// Display name, also used to build the DNS fallback name.
    pub name: String,
    /// Node currently hosting the resource.
    pub node: String,
    pub kind: ResourceKind,
    pub status: ResourceStatus,
    /// First IPv4 address reported by the guest agent, looked up on every listing.
    pub ipv4_address: Option<String>,
    pub is_template: bool,
}

impl Resource {
    /// Validates a raw cluster resource record of kind `kind`.
    ///
    /// A record without a positive `vmid` or without a `node` is rejected.
    pub fn from_cluster_item(
        kind: ResourceKind,
        item: ClusterResourceItem,
    ) -> Result<Self, ValidationError> {
        let vmid = match item.vmid {
            Some(vmid) if vmid > 0 => vmid,
            _ => {
                return Err(ValidationError::field(
                    "vmid",
                    format!("{} record '{}' has no valid vmid", kind, item.id),
                ));
            }
        };
        let node = match item.node {
            Some(node) if !node.is_empty() => node,
            _ => {
                return Err(ValidationError::field(
                    "node",
                    format!("{} {} has no node", kind, vmid),
                ));
            }
        };

        Ok(Self {
            vmid,
            name: item.name.unwrap_or_default(),
            node,
            kind,
            status: item
                .status
                .as_deref()
                .map(ResourceStatus::from)
                .unwrap_or_else(|| ResourceStatus::Other("unknown".to_string())),
            ipv4_address: None,
            is_template: item.template,
        })
    }

    /// Whether a guest-agent address lookup makes sense for this resource.
    pub fn wants_address(&self) -> bool {
        self.status.is_running() && !self.is_template
    }
}

/// One entry of `/cluster/resources?type=vm`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClusterResourceItem {
    /// `qemu/100`, `lxc/200`.
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_u32::deserialize")]
    pub vmid: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_bool::deserialize")]
    pub template: bool,
}

impl ClusterResourceItem {
    /// `None` for record types other than VMs and containers.
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_api_segment(&self.resource_type)
    }
}

/// A node as returned by `/nodes`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NodeListItem {
    /// The node name (e.g., "pve1").
    pub node: String,
    /// Current node status (e.g., "online", "offline", "unknown").
    #[serde(default)]
    pub status: Option<String>,
}

impl NodeListItem {
    /// Only `online` counts; `offline` and `unknown` nodes do not answer API calls.
    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }
}
