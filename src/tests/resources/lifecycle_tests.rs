use crate::{
    ClientConfig, ConfigParams, CreateFromTemplate, ProxmoxClient, ProxmoxError, Resource,
    ResourceKind, ResourceStatus, Task, TaskStatus, ValidationError,
    core::domain::port::MockResourceGateway,
};
use mockall::Sequence;

fn resource(vmid: u32, node: &str, kind: ResourceKind, status: &str, is_template: bool) -> Resource {
    Resource {
        vmid,
        name: format!("res-{}", vmid),
        node: node.to_string(),
        kind,
        status: ResourceStatus::from(status),
        ipv4_address: None,
        is_template,
    }
}

fn client(gateway: MockResourceGateway) -> ProxmoxClient<MockResourceGateway> {
    ProxmoxClient::with_gateway(gateway, ClientConfig::default())
}

#[tokio::test]
async fn test_next_vmid_spans_vms_and_containers() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_inventory().times(1).returning(|| {
        Ok(vec![
            resource(100, "pve1", ResourceKind::Qemu, "running", false),
            resource(101, "pve2", ResourceKind::Qemu, "unknown", false),
            resource(102, "pve1", ResourceKind::Lxc, "running", false),
        ])
    });
    gateway.expect_list_resources().times(0);

    assert_eq!(client(gateway).next_vmid().await.unwrap(), 103);
}

#[tokio::test]
async fn test_next_vmid_on_empty_cluster() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_inventory().returning(|| Ok(vec![]));

    assert_eq!(client(gateway).next_vmid().await.unwrap(), 100);
}

#[tokio::test]
async fn test_create_from_template() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_templates().times(1).returning(|| {
        Ok(vec![resource(9000, "pve2", ResourceKind::Qemu, "stopped", true)])
    });
    gateway.expect_list_inventory().returning(|| {
        Ok(vec![
            resource(100, "pve1", ResourceKind::Qemu, "running", false),
            resource(9000, "pve2", ResourceKind::Qemu, "stopped", true),
        ])
    });
    gateway.expect_list_resources().times(0);
    gateway
        .expect_clone_template()
        .withf(|node, template_id, new_id, name| {
            node == "pve2" && *template_id == 9000 && *new_id == 101 && name == "web-2"
        })
        .times(1)
        .returning(|node, _, _, _| Ok(Task::new("UPID:pve2:clone", node)));
    gateway
        .expect_set_config()
        .withf(|node, kind, vmid, params| {
            node == "pve2"
                && *kind == ResourceKind::Qemu
                && *vmid == 101
                && params.get("ciuser") == Some(&serde_json::json!("admin"))
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));
    gateway
        .expect_start_resource()
        .withf(|node, kind, vmid| node == "pve2" && *kind == ResourceKind::Qemu && *vmid == 101)
        .times(1)
        .returning(|node, _, _| Ok(Task::new("UPID:pve2:start", node)));
    gateway
        .expect_task_status()
        .times(2)
        .returning(|_| Ok(TaskStatus::stopped("OK")));

    let mut cloud_init = ConfigParams::new();
    cloud_init.insert("ciuser".to_string(), "admin".into());
    let request = CreateFromTemplate {
        template_id: 9000,
        name: "web-2".to_string(),
        cloud_init,
        start: true,
    };

    assert_eq!(client(gateway).create_from_template(&request).await.unwrap(), 101);
}

#[tokio::test]
async fn test_create_from_unknown_template() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_templates().returning(|| Ok(vec![]));
    gateway.expect_clone_template().times(0);

    let request = CreateFromTemplate {
        template_id: 9000,
        name: "web-2".to_string(),
        ..Default::default()
    };
    let result = client(gateway).create_from_template(&request).await;
    assert!(matches!(
        result,
        Err(ProxmoxError::NotFound {
            kind: ResourceKind::Qemu,
            vmid: 9000
        })
    ));
}

#[tokio::test]
async fn test_failed_clone_stops_the_workflow() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_templates().returning(|| {
        Ok(vec![resource(9000, "pve1", ResourceKind::Qemu, "stopped", true)])
    });
    gateway.expect_list_inventory().returning(|| Ok(vec![]));
    gateway
        .expect_clone_template()
        .returning(|node, _, _, _| Ok(Task::new("UPID:pve1:clone", node)));
    gateway
        .expect_task_status()
        .returning(|_| Ok(TaskStatus::stopped("clone failed: storage full")));
    gateway.expect_set_config().times(0);
    gateway.expect_start_resource().times(0);

    let mut cloud_init = ConfigParams::new();
    cloud_init.insert("ciuser".to_string(), "admin".into());
    let request = CreateFromTemplate {
        template_id: 9000,
        name: "web".to_string(),
        cloud_init,
        start: true,
    };

    match client(gateway).create_from_template(&request).await {
        Err(ProxmoxError::TaskFailed { upid, exit_status }) => {
            assert_eq!(upid, "UPID:pve1:clone");
            assert_eq!(exit_status, "clone failed: storage full");
        }
        other => panic!("expected TaskFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_start_all_reports_each_resource() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_inventory().returning(|| {
        Ok(vec![
            resource(100, "pve1", ResourceKind::Qemu, "stopped", false),
            resource(101, "pve1", ResourceKind::Qemu, "running", false),
            resource(9000, "pve1", ResourceKind::Qemu, "stopped", true),
            resource(555, "pve1", ResourceKind::Lxc, "stopped", false),
        ])
    });
    gateway
        .expect_start_resource()
        .withf(|_, _, vmid| *vmid == 100)
        .times(1)
        .returning(|node, _, _| Ok(Task::new("UPID:pve1:start", node)));
    gateway
        .expect_task_status()
        .times(1)
        .returning(|_| Ok(TaskStatus::stopped("OK")));

    let outcomes = client(gateway)
        .start_all(ResourceKind::Qemu, &[100, 101, 9000, 555])
        .await
        .unwrap();

    let ids: Vec<u32> = outcomes.iter().map(|o| o.vmid).collect();
    assert_eq!(ids, vec![100, 101, 9000, 555]);
    assert!(outcomes[0].result.is_ok());
    assert!(outcomes[1].result.is_ok());
    assert!(matches!(
        outcomes[2].result,
        Err(ProxmoxError::Validation(ValidationError::ConstraintViolation(_)))
    ));
    assert!(matches!(
        outcomes[3].result,
        Err(ProxmoxError::NotFound { vmid: 555, .. })
    ));
}

#[tokio::test]
async fn test_stop_all_continues_after_a_failure() {
    let mut gateway = MockResourceGateway::new();
    gateway.expect_list_inventory().returning(|| {
        Ok(vec![
            resource(200, "pve1", ResourceKind::Lxc, "running", false),
            resource(201, "pve2", ResourceKind::Lxc, "running", false),
        ])
    });
    gateway
        .expect_stop_resource()
        .times(2)
        .returning(|node, _, vmid| Ok(Task::new(format!("UPID:{}:stop:{}", node, vmid), node)));
    gateway.expect_task_status().returning(|task| {
        if task.upid.ends_with(":200") {
            Ok(TaskStatus::stopped("command 'lxc-stop' failed"))
        } else {
            Ok(TaskStatus::stopped("OK"))
        }
    });

    let outcomes = client(gateway)
        .stop_all(ResourceKind::Lxc, &[200, 201])
        .await
        .unwrap();

    assert!(matches!(outcomes[0].result, Err(ProxmoxError::TaskFailed { .. })));
    assert!(outcomes[1].result.is_ok());
}

#[tokio::test]
async fn test_delete_stops_running_resource_first() {
    let mut gateway = MockResourceGateway::new();
    let mut seq = Sequence::new();
    gateway
        .expect_list_inventory()
        .returning(|| Ok(vec![resource(100, "pve1", ResourceKind::Qemu, "running", false)]));
    gateway
        .expect_stop_resource()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|node, _, _| Ok(Task::new("UPID:pve1:stop", node)));
    gateway
        .expect_delete_resource()
        .withf(|node, kind, vmid| node == "pve1" && *kind == ResourceKind::Qemu && *vmid == 100)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|node, _, _| Ok(Task::new("UPID:pve1:destroy", node)));
    gateway
        .expect_task_status()
        .times(2)
        .returning(|_| Ok(TaskStatus::stopped("OK")));

    client(gateway)
        .delete(ResourceKind::Qemu, 100)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_stopped_resource() {
    let mut gateway = MockResourceGateway::new();
    gateway
        .expect_list_inventory()
        .returning(|| Ok(vec![resource(100, "pve1", ResourceKind::Qemu, "stopped", false)]));
    gateway.expect_stop_resource().times(0);
    gateway
        .expect_delete_resource()
        .times(1)
        .returning(|node, _, _| Ok(Task::new("UPID:pve1:destroy", node)));
    gateway
        .expect_task_status()
        .times(1)
        .returning(|_| Ok(TaskStatus::stopped("OK")));

    client(gateway)
        .delete(ResourceKind::Qemu, 100)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_unknown_resource() {
    let mut gateway = MockResourceGateway::new();
    gateway
        .expect_list_inventory()
        .returning(|| Ok(vec![resource(300, "pve1", ResourceKind::Qemu, "stopped", false)]));
    gateway.expect_delete_resource().times(0);

    let result = client(gateway).delete(ResourceKind::Lxc, 300).await;
    assert!(result.unwrap_err().is_not_found());
}
