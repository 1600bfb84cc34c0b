//! Chooses the SSH destination for a resource: IP first, FQDN as fallback.

use crate::core::{
    application::service::address_resolver::AddressLookup,
    domain::{
        error::{ProxmoxError, ProxmoxResult},
        model::{
            connection_target::{ConnectionTarget, ResolutionEvent, TargetAddress},
            resource::ResourceKind,
            ssh::{SshCommand, SshOptions},
        },
        port::CommandExecutor,
    },
};
use tracing::{info, warn};

/// Resolves connection targets and hands SSH sessions to a [`CommandExecutor`].
pub struct ConnectionOrchestrator<L: AddressLookup> {
    lookup: L,
}

impl<L: AddressLookup> ConnectionOrchestrator<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    pub async fn resolve_target(
        &self,
        vmid: u32,
        kind: ResourceKind,
    ) -> ProxmoxResult<ConnectionTarget> {
        self.resolve_target_with(vmid, kind, |_| {}).await
    }

    /// Resolves the target, reporting each step to `on_event`.
    ///
    /// The FQDN lookup only runs when the IP lookup fails with `Unavailable`;
    /// every other failure, including `NotFound`, is returned as is.
    pub async fn resolve_target_with<F>(
        &self,
        vmid: u32,
        kind: ResourceKind,
        mut on_event: F,
    ) -> ProxmoxResult<ConnectionTarget>
    where
        F: FnMut(&ResolutionEvent) + Send,
    {
        on_event(&ResolutionEvent::TryingIp { kind, vmid });
        let address = match self.lookup.resolve_ip(vmid, kind).await {
            Ok(ip) => TargetAddress::Ip(ip),
            Err(ProxmoxError::Unavailable { .. }) => {
                on_event(&ResolutionEvent::IpUnavailable { kind, vmid });
                on_event(&ResolutionEvent::TryingFqdn { kind, vmid });
                match self.lookup.resolve_fqdn(vmid, kind).await {
                    Ok(fqdn) => TargetAddress::Fqdn(fqdn),
                    // The listing changed between the two lookups.
                    Err(e) => {
                        warn!(%kind, vmid, error = %e, "FQDN fallback failed");
                        return Err(ProxmoxError::BothStrategiesFailed { kind, vmid });
                    }
                }
            }
            Err(e) => return Err(e),
        };

        let target = ConnectionTarget {
            address,
            vmid,
            kind,
        };
        info!(%kind, vmid, address = %target.address, strategy = %target.strategy(), "Resolved connection target");
        on_event(&ResolutionEvent::Resolved(target.clone()));
        Ok(target)
    }

    /// Resolves the target and runs `ssh -i <key> <user>@<target>` through `executor`.
    ///
    /// Returns the exit code of the SSH process.
    pub async fn connect<E, F>(
        &self,
        vmid: u32,
        kind: ResourceKind,
        options: &SshOptions,
        executor: &E,
        on_event: F,
    ) -> ProxmoxResult<i32>
    where
        E: CommandExecutor + ?Sized,
        F: FnMut(&ResolutionEvent) + Send,
    {
        let target = self.resolve_target_with(vmid, kind, on_event).await?;
        let command = SshCommand::new(&target, options);
        executor.run(&command).await
    }
}
