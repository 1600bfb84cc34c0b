mod proxmox_host;
mod proxmox_port;
mod proxmox_realm;
mod proxmox_token;
mod proxmox_uri;
mod proxmox_username;
pub(crate) mod serde_helpers;

pub use proxmox_host::ProxmoxHost;
pub use proxmox_port::{DEFAULT_PORT, ProxmoxPort};
pub use proxmox_realm::ProxmoxRealm;
pub use proxmox_token::{ProxmoxTokenId, ProxmoxTokenSecret};
pub use proxmox_uri::ProxmoxUrl;
pub use proxmox_username::ProxmoxUsername;
