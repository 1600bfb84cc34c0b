//! [`ResourceGateway`] implementation backed by the Proxmox VE HTTP API.

use crate::core::{
    domain::{
        error::ProxmoxResult,
        model::{
            guest_network::{AgentNetworkResponse, GuestInterface, LxcInterface, first_ipv4},
            resource::{ClusterResourceItem, NodeListItem, Resource, ResourceKind},
            task::{Task, TaskStatus, TaskStatusResponse},
        },
        port::{ConfigParams, ResourceGateway},
    },
    infrastructure::api_client::ApiClient,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

/// Talks to the cluster through an [`ApiClient`].
#[derive(Debug)]
pub struct ProxmoxGateway {
    api: ApiClient,
}

impl ProxmoxGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    async fn guest_interfaces(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
    ) -> ProxmoxResult<Vec<GuestInterface>> {
        match kind {
            ResourceKind::Qemu => {
                let path = format!("nodes/{}/qemu/{}/agent/network-get-interfaces", node, vmid);
                let response: AgentNetworkResponse = self.api.get(&path).await?;
                Ok(response.result.into_iter().map(Into::into).collect())
            }
            ResourceKind::Lxc => {
                let path = format!("nodes/{}/lxc/{}/interfaces", node, vmid);
                let response: Vec<LxcInterface> = self.api.get(&path).await?;
                Ok(response.into_iter().map(Into::into).collect())
            }
        }
    }

    async fn submit(&self, node: &str, path: String, body: serde_json::Value) -> ProxmoxResult<Task> {
        let upid: String = self.api.post(&path, &body).await?;
        debug!(%node, %upid, %path, "Task submitted");
        Ok(Task::new(upid, node))
    }
}

#[async_trait]
impl ResourceGateway for ProxmoxGateway {
    async fn list_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>> {
        self.api.get("nodes").await
    }

    async fn list_inventory(&self) -> ProxmoxResult<Vec<Resource>> {
        let items: Vec<ClusterResourceItem> = self.api.get("cluster/resources?type=vm").await?;
        let mut resources = Vec::with_capacity(items.len());
        for item in items {
            let Some(kind) = item.kind() else {
                debug!(id = %item.id, resource_type = %item.resource_type, "Skipping non-guest record");
                continue;
            };
            resources.push(Resource::from_cluster_item(kind, item)?);
        }
        resources.sort_by_key(|r| r.vmid);
        Ok(resources)
    }

    async fn list_resources(&self, kind: ResourceKind) -> ProxmoxResult<Vec<Resource>> {
        let mut resources = self.list_inventory().await?;
        resources.retain(|r| r.kind == kind);

        // One guest-agent query at a time, in listing order. Do not parallelize:
        // concurrent agent calls overload the hypervisor.
        for resource in resources.iter_mut().filter(|r| r.wants_address()) {
            resource.ipv4_address = self
                .guest_ipv4(&resource.node, resource.kind, resource.vmid)
                .await;
        }

        Ok(resources)
    }

    async fn list_templates(&self) -> ProxmoxResult<Vec<Resource>> {
        let mut templates = self.list_inventory().await?;
        templates.retain(|r| r.kind == ResourceKind::Qemu && r.is_template);
        Ok(templates)
    }

    async fn clone_template(
        &self,
        node: &str,
        template_id: u32,
        new_id: u32,
        name: &str,
    ) -> ProxmoxResult<Task> {
        info!(%node, template_id, new_id, %name, "Cloning template");
        let path = format!("nodes/{}/qemu/{}/clone", node, template_id);
        self.submit(node, path, json!({"newid": new_id, "name": name, "full": 1}))
            .await
    }

    async fn delete_resource(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
    ) -> ProxmoxResult<Task> {
        info!(%node, %kind, vmid, "Deleting resource");
        let path = format!("nodes/{}/{}/{}?purge=1", node, kind.api_segment(), vmid);
        let upid: String = self.api.delete(&path).await?;
        Ok(Task::new(upid, node))
    }

    async fn start_resource(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
    ) -> ProxmoxResult<Task> {
        info!(%node, %kind, vmid, "Starting resource");
        let path = format!("nodes/{}/{}/{}/status/start", node, kind.api_segment(), vmid);
        self.submit(node, path, json!({})).await
    }

    async fn stop_resource(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
    ) -> ProxmoxResult<Task> {
        info!(%node, %kind, vmid, "Stopping resource");
        let path = format!("nodes/{}/{}/{}/status/stop", node, kind.api_segment(), vmid);
        self.submit(node, path, json!({})).await
    }

    async fn set_config(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
        params: &ConfigParams,
    ) -> ProxmoxResult<()> {
        debug!(%node, %kind, vmid, keys = ?params.keys().collect::<Vec<_>>(), "Writing config");
        let path = format!("nodes/{}/{}/{}/config", node, kind.api_segment(), vmid);
        let _: serde_json::Value = self.api.put(&path, params).await?;
        Ok(())
    }

    async fn task_status(&self, task: &Task) -> ProxmoxResult<TaskStatus> {
        let path = format!("nodes/{}/tasks/{}/status", task.node, task.upid);
        let raw: TaskStatusResponse = self.api.get(&path).await?;
        Ok(raw.into())
    }

    async fn guest_ipv4(&self, node: &str, kind: ResourceKind, vmid: u32) -> Option<String> {
        match self.guest_interfaces(node, kind, vmid).await {
            Ok(interfaces) => {
                let ip = first_ipv4(&interfaces);
                if ip.is_none() {
                    debug!(%node, %kind, vmid, "Guest reported no IPv4 address");
                }
                ip
            }
            Err(e) => {
                // A single unreachable guest agent must not fail a listing.
                warn!(%node, %kind, vmid, error = %e, "Guest agent query failed");
                None
            }
        }
    }
}
