//! Proxmox VE resource orchestration.
//!
//! Allocates VMIDs, drives asynchronous hypervisor tasks to completion and
//! resolves an SSH destination (IP address, falling back to a DNS name) for
//! virtual machines and containers.

mod core;

#[cfg(test)]
mod tests;

pub use crate::core::application::service::{
    address_resolver::{AddressLookup, AddressResolver, fqdn_for},
    connection_orchestrator::ConnectionOrchestrator,
    lifecycle_service::{BatchOutcome, CreateFromTemplate, LifecycleService},
    task_poller::TaskPoller,
    vmid_allocator::{VMID_FLOOR, allocate_vmid},
};
pub use crate::core::domain::{
    error::{ProxmoxError, ProxmoxResult, ValidationError},
    model::{
        client_config::{ClientConfig, DEFAULT_DNS_SUFFIX, RateLimitConfig},
        connection_target::{ConnectionTarget, ResolutionEvent, ResolutionStrategy, TargetAddress},
        guest_network::{GuestInterface, first_ipv4},
        proxmox_connection::ProxmoxConnection,
        resource::{NodeListItem, Resource, ResourceKind, ResourceStatus},
        ssh::{SshCommand, SshOptions},
        task::{Task, TaskState, TaskStatus},
    },
    port::{CommandExecutor, ConfigParams, ResourceGateway},
    value_object::{
        DEFAULT_PORT, ProxmoxHost, ProxmoxPort, ProxmoxRealm, ProxmoxTokenId, ProxmoxTokenSecret,
        ProxmoxUrl, ProxmoxUsername,
    },
};
pub use crate::core::infrastructure::{
    api_client::ApiClient, process_executor::ProcessExecutor, proxmox_gateway::ProxmoxGateway,
};

use std::time::Duration;

/// A client for orchestrating resources on a Proxmox VE cluster.
///
/// # Examples
///
/// ```no_run
/// use sflab_proxmox::{ProxmoxClient, ProxmoxResult, ResourceKind, SshOptions};
///
/// #[tokio::main]
/// async fn main() -> ProxmoxResult<()> {
///     let client = ProxmoxClient::builder()
///         .host("pve.example.com")
///         .port(8006)
///         .credentials("root", "pam", "automation", "0f3c2a4e-9b1d-4c6e-8a7f-112233445566")
///         .verify_tls(false)
///         .build()?;
///
///     let vmid = client.next_vmid().await?;
///     println!("next free id: {}", vmid);
///
///     let code = client
///         .connect(100, ResourceKind::Qemu, &SshOptions::default(), |event| {
///             println!("{}", event)
///         })
///         .await?;
///     std::process::exit(code);
/// }
/// ```
pub struct ProxmoxClient<G: ResourceGateway = ProxmoxGateway> {
    gateway: G,
    config: ClientConfig,
}

/// Builder for ProxmoxClient configuration
#[derive(Default)]
pub struct ProxmoxClientBuilder {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    realm: Option<String>,
    token_id: Option<String>,
    token_secret: Option<String>,
    insecure_http: bool,
    skip_tls_verification: bool,
    config: ClientConfig,
}

impl ProxmoxClientBuilder {
    /// Seeds the builder from `PROXMOX_HOST`, `PROXMOX_PORT`, `PROXMOX_USER`,
    /// `PROXMOX_REALM`, `PROXMOX_TOKEN_ID`, `PROXMOX_TOKEN_SECRET` and
    /// `PROXMOX_VERIFY_SSL`. Unset variables are left empty.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            host: var("PROXMOX_HOST"),
            port: var("PROXMOX_PORT").and_then(|p| p.parse().ok()),
            username: var("PROXMOX_USER"),
            realm: var("PROXMOX_REALM"),
            token_id: var("PROXMOX_TOKEN_ID"),
            token_secret: var("PROXMOX_TOKEN_SECRET"),
            insecure_http: false,
            skip_tls_verification: var("PROXMOX_VERIFY_SSL")
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no")),
            config: ClientConfig::default(),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// API token credentials: `user@realm!token_id` with its secret.
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        realm: impl Into<String>,
        token_id: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.realm = Some(realm.into());
        self.token_id = Some(token_id.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Use HTTPS (default) or plain HTTP.
    pub fn secure(mut self, secure: bool) -> Self {
        self.insecure_http = !secure;
        self
    }

    /// Verify the server certificate (default). Disable for self-signed clusters.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.skip_tls_verification = !verify;
        self
    }

    pub fn rate_limit(mut self, requests_per_second: u32, burst_size: u32) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            requests_per_second,
            burst_size,
        });
        self
    }

    /// Domain appended to resource names for the FQDN fallback.
    pub fn dns_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.dns_suffix = suffix.into();
        self
    }

    pub fn task_timeout(mut self, timeout: Duration) -> Self {
        self.config.task_timeout = timeout;
        self
    }

    pub fn task_poll_interval(mut self, interval: Duration) -> Self {
        self.config.task_poll_interval = interval;
        self
    }

    /// Validates the collected settings and connects the HTTP client.
    ///
    /// # Errors
    /// `Validation` naming the first missing or malformed field, or
    /// `Transport` if the HTTP client cannot be built.
    pub fn build(self) -> ProxmoxResult<ProxmoxClient> {
        let host = ProxmoxHost::new(required(self.host, "host")?)?;
        let port = ProxmoxPort::new(self.port.unwrap_or(DEFAULT_PORT))?;
        let username = ProxmoxUsername::new(required(self.username, "username")?)?;
        let realm = ProxmoxRealm::new(required(self.realm, "realm")?)?;
        let token_id = ProxmoxTokenId::new(required(self.token_id, "token_id")?)?;
        let token_secret = ProxmoxTokenSecret::new(required(self.token_secret, "token_secret")?)?;
        let url = ProxmoxUrl::new(&host, &port, !self.insecure_http)?;

        if self.config.dns_suffix.trim_matches('.').is_empty() {
            return Err(ValidationError::field("dns_suffix", "DNS suffix cannot be empty").into());
        }
        if self.config.task_poll_interval.is_zero() {
            return Err(
                ValidationError::field("task_poll_interval", "Poll interval must be positive")
                    .into(),
            );
        }

        let connection = ProxmoxConnection::new(
            host,
            port,
            username,
            realm,
            token_id,
            token_secret,
            !self.skip_tls_verification,
            url,
        );
        let api_client = ApiClient::new(connection, &self.config)?;

        Ok(ProxmoxClient {
            gateway: ProxmoxGateway::new(api_client),
            config: self.config,
        })
    }
}

fn required(value: Option<String>, field: &str) -> ProxmoxResult<String> {
    value.ok_or_else(|| ValidationError::field(field, format!("{} is required", field)).into())
}

impl ProxmoxClient {
    /// Creates a new builder for ProxmoxClient configuration
    pub fn builder() -> ProxmoxClientBuilder {
        ProxmoxClientBuilder::default()
    }
}

impl<G: ResourceGateway> ProxmoxClient<G> {
    /// Wraps any gateway implementation.
    pub fn with_gateway(gateway: G, config: ClientConfig) -> Self {
        Self { gateway, config }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn lifecycle(&self) -> LifecycleService<'_, G> {
        LifecycleService::new(&self.gateway, &self.config)
    }

    fn resolver(&self) -> AddressResolver<'_, G> {
        AddressResolver::with_dns_suffix(&self.gateway, self.config.dns_suffix.clone())
    }

    /// Every VM and container in the cluster, offline nodes included, without addresses.
    pub async fn list_inventory(&self) -> ProxmoxResult<Vec<Resource>> {
        self.gateway.list_inventory().await
    }

    /// Lists every resource of `kind`, with guest IPv4 addresses.
    pub async fn list_resources(&self, kind: ResourceKind) -> ProxmoxResult<Vec<Resource>> {
        self.gateway.list_resources(kind).await
    }

    pub async fn list_templates(&self) -> ProxmoxResult<Vec<Resource>> {
        self.gateway.list_templates().await
    }

    /// Smallest unused VMID `>= 100` across VMs and containers.
    pub async fn next_vmid(&self) -> ProxmoxResult<u32> {
        self.lifecycle().next_vmid().await
    }

    /// Waits for `task` using the configured timeout and poll interval.
    pub async fn wait_for_task(&self, task: &Task) -> ProxmoxResult<()> {
        self.lifecycle().wait_for_task(task).await
    }

    pub async fn create_from_template(&self, request: &CreateFromTemplate) -> ProxmoxResult<u32> {
        self.lifecycle().create_from_template(request).await
    }

    pub async fn start_all(
        &self,
        kind: ResourceKind,
        vmids: &[u32],
    ) -> ProxmoxResult<Vec<BatchOutcome>> {
        self.lifecycle().start_all(kind, vmids).await
    }

    pub async fn stop_all(
        &self,
        kind: ResourceKind,
        vmids: &[u32],
    ) -> ProxmoxResult<Vec<BatchOutcome>> {
        self.lifecycle().stop_all(kind, vmids).await
    }

    pub async fn delete(&self, kind: ResourceKind, vmid: u32) -> ProxmoxResult<()> {
        self.lifecycle().delete(kind, vmid).await
    }

    pub async fn resolve_ip(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String> {
        self.resolver().resolve_ip(vmid, kind).await
    }

    pub async fn resolve_fqdn(&self, vmid: u32, kind: ResourceKind) -> ProxmoxResult<String> {
        self.resolver().resolve_fqdn(vmid, kind).await
    }

    /// IP address if the guest reports one, otherwise the FQDN.
    pub async fn resolve_target(
        &self,
        vmid: u32,
        kind: ResourceKind,
    ) -> ProxmoxResult<ConnectionTarget> {
        ConnectionOrchestrator::new(self.resolver())
            .resolve_target(vmid, kind)
            .await
    }

    pub async fn resolve_target_with<F>(
        &self,
        vmid: u32,
        kind: ResourceKind,
        on_event: F,
    ) -> ProxmoxResult<ConnectionTarget>
    where
        F: FnMut(&ResolutionEvent) + Send,
    {
        ConnectionOrchestrator::new(self.resolver())
            .resolve_target_with(vmid, kind, on_event)
            .await
    }

    /// Opens an interactive SSH session and returns its exit code.
    pub async fn connect<F>(
        &self,
        vmid: u32,
        kind: ResourceKind,
        options: &SshOptions,
        on_event: F,
    ) -> ProxmoxResult<i32>
    where
        F: FnMut(&ResolutionEvent) + Send,
    {
        self.connect_with(&ProcessExecutor, vmid, kind, options, on_event)
            .await
    }

    /// Like [`ProxmoxClient::connect`], with a caller-supplied executor.
    pub async fn connect_with<E, F>(
        &self,
        executor: &E,
        vmid: u32,
        kind: ResourceKind,
        options: &SshOptions,
        on_event: F,
    ) -> ProxmoxResult<i32>
    where
        E: CommandExecutor + ?Sized,
        F: FnMut(&ResolutionEvent) + Send,
    {
        ConnectionOrchestrator::new(self.resolver())
            .connect(vmid, kind, options, executor, on_event)
            .await
    }
}
