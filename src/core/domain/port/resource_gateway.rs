//! The boundary between orchestration logic and the hypervisor API.

use crate::core::domain::{
    error::ProxmoxResult,
    model::{
        resource::{NodeListItem, Resource, ResourceKind},
        task::{Task, TaskStatus},
    },
};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Key/value configuration written with [`ResourceGateway::set_config`]
/// (cloud-init `ciuser`, `ipconfig0`, `sshkeys`, ...).
pub type ConfigParams = BTreeMap<String, serde_json::Value>;

/// Raw resource and task access against a Proxmox VE cluster.
///
/// Every call re-queries the cluster; nothing is cached between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceGateway: Send + Sync {
    /// Lists the cluster's nodes.
    async fn list_nodes(&self) -> ProxmoxResult<Vec<NodeListItem>>;

    /// Lists every VM and container in the cluster, including those on
    /// offline nodes, without guest addresses.
    async fn list_inventory(&self) -> ProxmoxResult<Vec<Resource>>;

    /// Lists every resource of one kind across the cluster, with guest IPv4
    /// addresses looked up one resource at a time in listing order.
    async fn list_resources(&self, kind: ResourceKind) -> ProxmoxResult<Vec<Resource>>;

    /// Lists VM templates, without guest addresses.
    async fn list_templates(&self) -> ProxmoxResult<Vec<Resource>>;

    /// Clones `template_id` into a new VM `new_id` called `name`.
    async fn clone_template(
        &self,
        node: &str,
        template_id: u32,
        new_id: u32,
        name: &str,
    ) -> ProxmoxResult<Task>;

    async fn delete_resource(&self, node: &str, kind: ResourceKind, vmid: u32)
    -> ProxmoxResult<Task>;

    async fn start_resource(&self, node: &str, kind: ResourceKind, vmid: u32)
    -> ProxmoxResult<Task>;

    async fn stop_resource(&self, node: &str, kind: ResourceKind, vmid: u32) -> ProxmoxResult<Task>;

    /// Writes configuration keys. Synchronous on the hypervisor side, no task handle.
    async fn set_config(
        &self,
        node: &str,
        kind: ResourceKind,
        vmid: u32,
        params: &ConfigParams,
    ) -> ProxmoxResult<()>;

    /// Fetches one status snapshot of a task.
    async fn task_status(&self, task: &Task) -> ProxmoxResult<TaskStatus>;

    /// First non-loopback IPv4 address reported from inside the guest.
    ///
    /// Failures are logged and reported as `None`, never as an error.
    async fn guest_ipv4(&self, node: &str, kind: ResourceKind, vmid: u32) -> Option<String>;
}
