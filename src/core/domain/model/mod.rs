pub mod client_config;
pub mod connection_target;
pub mod guest_network;
pub mod proxmox_connection;
pub mod resource;
pub mod ssh;
pub mod task;
