//! Multi-step resource operations built from gateway calls and the task poller.

use crate::core::{
    application::service::{task_poller::TaskPoller, vmid_allocator::allocate_vmid},
    domain::{
        error::{ProxmoxError, ProxmoxResult, ValidationError},
        model::{
            client_config::ClientConfig,
            resource::{Resource, ResourceKind},
            task::Task,
        },
        port::{ConfigParams, ResourceGateway},
    },
};
use tracing::info;

/// Parameters for cloning a VM from a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateFromTemplate {
    pub template_id: u32,
    pub name: String,
    /// Written with `set_config` after the clone finishes (e.g. `ciuser`, `ipconfig0`).
    pub cloud_init: ConfigParams,
    pub start: bool,
}

/// Outcome of one resource in a batch operation.
#[derive(Debug)]
pub struct BatchOutcome {
    pub vmid: u32,
    pub result: ProxmoxResult<()>,
}

pub struct LifecycleService<'a, G: ResourceGateway + ?Sized> {
    gateway: &'a G,
    config: &'a ClientConfig,
}

impl<'a, G: ResourceGateway + ?Sized> LifecycleService<'a, G> {
    pub fn new(gateway: &'a G, config: &'a ClientConfig) -> Self {
        Self { gateway, config }
    }

    /// Waits for `task` with the configured timeout and poll interval.
    pub async fn wait_for_task(&self, task: &Task) -> ProxmoxResult<()> {
        TaskPoller::new(self.gateway)
            .with_interval(self.config.task_poll_interval)
            .with_timeout(self.config.task_timeout)
            .wait(task)
            .await
    }

    /// Next free VMID across VMs and containers on every node, offline ones included.
    pub async fn next_vmid(&self) -> ProxmoxResult<u32> {
        let used = self.gateway.list_inventory().await?;
        Ok(allocate_vmid(used.iter().map(|r| r.vmid)))
    }

    /// Clones a template into a new VM and returns the new VMID.
    pub async fn create_from_template(&self, request: &CreateFromTemplate) -> ProxmoxResult<u32> {
        let template = self
            .gateway
            .list_templates()
            .await?
            .into_iter()
            .find(|t| t.vmid == request.template_id)
            .ok_or(ProxmoxError::NotFound {
                kind: ResourceKind::Qemu,
                vmid: request.template_id,
            })?;

        let new_id = self.next_vmid().await?;
        info!(template_id = template.vmid, new_id, name = %request.name, "Creating VM from template");

        let task = self
            .gateway
            .clone_template(&template.node, template.vmid, new_id, &request.name)
            .await?;
        self.wait_for_task(&task).await?;

        if !request.cloud_init.is_empty() {
            self.gateway
                .set_config(&template.node, ResourceKind::Qemu, new_id, &request.cloud_init)
                .await?;
        }

        if request.start {
            let task = self
                .gateway
                .start_resource(&template.node, ResourceKind::Qemu, new_id)
                .await?;
            self.wait_for_task(&task).await?;
        }

        Ok(new_id)
    }

    /// Starts each resource in turn, waiting for its task before the next.
    pub async fn start_all(&self, kind: ResourceKind, vmids: &[u32]) -> ProxmoxResult<Vec<BatchOutcome>> {
        self.run_batch(kind, vmids, true).await
    }

    /// Stops each resource in turn, waiting for its task before the next.
    pub async fn stop_all(&self, kind: ResourceKind, vmids: &[u32]) -> ProxmoxResult<Vec<BatchOutcome>> {
        self.run_batch(kind, vmids, false).await
    }

    /// Stops the resource if it is running, then deletes it.
    pub async fn delete(&self, kind: ResourceKind, vmid: u32) -> ProxmoxResult<()> {
        let resources = self.gateway.list_inventory().await?;
        let resource = find(&resources, kind, vmid)?;

        if resource.status.is_running() {
            let task = self
                .gateway
                .stop_resource(&resource.node, kind, vmid)
                .await?;
            self.wait_for_task(&task).await?;
        }

        let task = self
            .gateway
            .delete_resource(&resource.node, kind, vmid)
            .await?;
        self.wait_for_task(&task).await
    }

    async fn run_batch(
        &self,
        kind: ResourceKind,
        vmids: &[u32],
        start: bool,
    ) -> ProxmoxResult<Vec<BatchOutcome>> {
        let resources = self.gateway.list_inventory().await?;
        let mut outcomes = Vec::with_capacity(vmids.len());
        // Sequential: the hypervisor gets one power operation at a time.
        for &vmid in vmids {
            let result = match find(&resources, kind, vmid) {
                Ok(resource) => self.power(resource, start).await,
                Err(e) => Err(e),
            };
            outcomes.push(BatchOutcome { vmid, result });
        }
        Ok(outcomes)
    }

    async fn power(&self, resource: &Resource, start: bool) -> ProxmoxResult<()> {
        if resource.is_template {
            return Err(ValidationError::ConstraintViolation(format!(
                "{} {} is a template and cannot be started or stopped",
                resource.kind, resource.vmid
            ))
            .into());
        }
        if resource.status.is_running() == start {
            info!(kind = %resource.kind, vmid = resource.vmid, status = %resource.status, "Already in requested state");
            return Ok(());
        }

        let task = if start {
            self.gateway
                .start_resource(&resource.node, resource.kind, resource.vmid)
                .await?
        } else {
            self.gateway
                .stop_resource(&resource.node, resource.kind, resource.vmid)
                .await?
        };
        self.wait_for_task(&task).await
    }
}

fn find(resources: &[Resource], kind: ResourceKind, vmid: u32) -> ProxmoxResult<&Resource> {
    resources
        .iter()
        .find(|r| r.kind == kind && r.vmid == vmid)
        .ok_or(ProxmoxError::NotFound { kind, vmid })
}
