pub mod api_client;
pub mod process_executor;
pub mod proxmox_gateway;
