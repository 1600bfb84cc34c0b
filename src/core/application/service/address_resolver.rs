//! Resolves a resource to an IPv4 address or a DNS fallback name.

use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult},
    model::{
        client_config::DEFAULT_DNS_SUFFIX,
        resource::{Resource, ResourceKind},
    },
    port::ResourceGateway,
};
use async_trait::async_trait;

/// Address lookups used by the connection orchestrator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// IPv4 address reported by the guest.
    ///
    /// # Errors
    /// * `NotFound` if `vmid` is not in `kind`'s collection
    /// * `Unavailable` if it exists but reports no address
    async fn resolve_ip(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String>;

    /// `<name>.<dns suffix>` for the resource.
    ///
    /// # Errors
    /// `NotFound` if `vmid` is not in `kind`'s collection.
    async fn resolve_fqdn(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String>;
}

/// Builds the DNS fallback name of a resource.
pub fn fqdn_for(name: &str, dns_suffix: &str) -> String {
    format!("{}.{}", name, dns_suffix.trim_start_matches('.'))
}

/// [`AddressLookup`] over a live resource listing.
pub struct AddressResolver<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    dns_suffix: String,
}

impl<'a, G: ResourceGateway + ?Sized> AddressResolver<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self::with_dns_suffix(gateway, DEFAULT_DNS_SUFFIX)
    }

    pub fn with_dns_suffix(gateway: &'a G, dns_suffix: impl Into<String>) -> Self {
        Self {
            gateway,
            dns_suffix: dns_suffix.into(),
        }
    }

    async fn find(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<Resource> {
        self.gateway
            .list_resources(kind)
            .await?
            .into_iter()
            .find(|r| r.vmid == vmid)
            .ok_or(ProxmoxError::NotFound { kind, vmid })
    }
}

#[async_trait]
impl<G: ResourceGateway + ?Sized> AddressLookup for AddressResolver<'_, G> {
    async fn resolve_ip(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String> {
        self.find(vmid, kind)
            .await?
            .ipv4_address
            .ok_or(ProxmoxError::Unavailable { kind, vmid })
    }

    async fn resolve_fqdn(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String> {
        let resource = self.find(vmid, kind).await?;
        Ok(fqdn_for(&resource.name, &self.dns_suffix))
    }
}
