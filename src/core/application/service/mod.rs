pub mod address_resolver;
pub mod connection_orchestrator;
pub mod lifecycle_service;
pub mod task_poller;
pub mod vmid_allocator;
