use crate::core::domain::value_object::{
    ProxmoxHost, ProxmoxPort, ProxmoxRealm, ProxmoxTokenId, ProxmoxTokenSecret, ProxmoxUrl,
    ProxmoxUsername,
};

/// Connection details for one Proxmox VE endpoint, authenticated by API token.
#[derive(Debug, Clone)]
pub struct ProxmoxConnection {
    host: ProxmoxHost,
    port: ProxmoxPort,
    username: ProxmoxUsername,
    realm: ProxmoxRealm,
    token_id: ProxmoxTokenId,
    token_secret: ProxmoxTokenSecret,
    verify_tls: bool,
    url: ProxmoxUrl,
}

impl ProxmoxConnection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: ProxmoxHost,
        port: ProxmoxPort,
        username: ProxmoxUsername,
        realm: ProxmoxRealm,
        token_id: ProxmoxTokenId,
        token_secret: ProxmoxTokenSecret,
        verify_tls: bool,
        url: ProxmoxUrl,
    ) -> Self {
        Self {
            host,
            port,
            username,
            realm,
            token_id,
            token_secret,
            verify_tls,
            url,
        }
    }

    pub fn host(&self) -> &ProxmoxHost {
        &self.host
    }

    pub fn port(&self) -> &ProxmoxPort {
        &self.port
    }

    pub fn username(&self) -> &ProxmoxUsername {
        &self.username
    }

    pub fn realm(&self) -> &ProxmoxRealm {
        &self.realm
    }

    pub fn token_id(&self) -> &ProxmoxTokenId {
        &self.token_id
    }

    /// Whether certificates must chain to a trusted root.
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn url(&self) -> &ProxmoxUrl {
        &self.url
    }

    /// Value of the `Authorization` header: `PVEAPIToken=user@realm!tokenid=secret`.
    pub fn authorization_header(&self) -> String {
        format!(
            "PVEAPIToken={}@{}!{}={}",
            self.username.as_str(),
            self.realm.as_str(),
            self.token_id.as_str(),
            self.token_secret.as_str()
        )
    }
}
