mod resources;

use crate::{
    ApiClient, ClientConfig, ProxmoxClient, ProxmoxConnection, ProxmoxGateway, ProxmoxHost,
    ProxmoxPort, ProxmoxRealm, ProxmoxTokenId, ProxmoxTokenSecret, ProxmoxUrl, ProxmoxUsername,
};
use serde_json::Value;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub(crate) fn create_test_connection(server_url: &str) -> ProxmoxConnection {
    ProxmoxConnection::new(
        ProxmoxHost::new_unchecked("localhost".to_string()),
        ProxmoxPort::new_unchecked(8006),
        ProxmoxUsername::new_unchecked("root".to_string()),
        ProxmoxRealm::new_unchecked("pam".to_string()),
        ProxmoxTokenId::new_unchecked("test".to_string()),
        ProxmoxTokenSecret::new_unchecked("secret".to_string()),
        true,
        ProxmoxUrl::new_unchecked(server_url.to_string() + "/"),
    )
}

pub(crate) fn create_test_gateway(mock_server: &MockServer) -> ProxmoxGateway {
    let connection = create_test_connection(&mock_server.uri());
    ProxmoxGateway::new(ApiClient::new(connection, &ClientConfig::default()).unwrap())
}

pub(crate) fn create_test_client(mock_server: &MockServer) -> ProxmoxClient {
    ProxmoxClient::with_gateway(create_test_gateway(mock_server), ClientConfig::default())
}

/// Mounts a `{"data": ...}` response for `GET /api2/json/{api_path}`.
pub(crate) async fn mount_get(mock_server: &MockServer, api_path: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api2/json/{}", api_path)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
        .mount(mock_server)
        .await;
}

/// Mounts `GET /api2/json/cluster/resources?type=vm`.
pub(crate) async fn mount_cluster_resources(mock_server: &MockServer, data: Value) {
    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/resources"))
        .and(query_param("type", "vm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
        .mount(mock_server)
        .await;
}

/// A QEMU guest agent payload with a loopback and one routable interface.
pub(crate) fn agent_interfaces(ipv4: &str) -> Value {
    serde_json::json!({
        "result": [
            {
                "name": "lo",
                "ip-addresses": [
                    {"ip-address-type": "ipv4", "ip-address": "127.0.0.1", "prefix": 8}
                ]
            },
            {
                "name": "eth0",
                "ip-addresses": [
                    {"ip-address-type": "ipv6", "ip-address": "fe80::1", "prefix": 64},
                    {"ip-address-type": "ipv4", "ip-address": ipv4, "prefix": 24}
                ]
            }
        ]
    })
}
