//! Result of resolving where to open an SSH session.

use crate::core::domain::model::resource::ResourceKind;
use serde::Serialize;
use std::fmt;

/// Which resolution strategy produced a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    Ip,
    Fqdn,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStrategy::Ip => write!(f, "ip"),
            ResolutionStrategy::Fqdn => write!(f, "fqdn"),
        }
    }
}

/// The host part of an SSH destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TargetAddress {
    Ip(String),
    Fqdn(String),
}

impl TargetAddress {
    pub fn as_str(&self) -> &str {
        match self {
            TargetAddress::Ip(s) | TargetAddress::Fqdn(s) => s,
        }
    }

    pub fn strategy(&self) -> ResolutionStrategy {
        match self {
            TargetAddress::Ip(_) => ResolutionStrategy::Ip,
            TargetAddress::Fqdn(_) => ResolutionStrategy::Fqdn,
        }
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved connection target for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTarget {
    pub address: TargetAddress,
    pub vmid: u32,
    pub kind: ResourceKind,
}

impl ConnectionTarget {
    pub fn strategy(&self) -> ResolutionStrategy {
        self.address.strategy()
    }
}

/// Progress notifications emitted while resolving a target, for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    TryingIp { kind: ResourceKind, vmid: u32 },
    IpUnavailable { kind: ResourceKind, vmid: u32 },
    TryingFqdn { kind: ResourceKind, vmid: u32 },
    Resolved(ConnectionTarget),
}

impl fmt::Display for ResolutionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionEvent::TryingIp { kind, vmid } => {
                write!(f, "Looking up IP address of {} {}...", kind, vmid)
            }
            ResolutionEvent::IpUnavailable { kind, vmid } => {
                write!(f, "No IP address reported for {} {}", kind, vmid)
            }
            ResolutionEvent::TryingFqdn { .. } => write!(f, "Trying FQDN fallback..."),
            ResolutionEvent::Resolved(target) => {
                write!(f, "Connecting to {} ({})", target.address, target.strategy())
            }
        }
    }
}
