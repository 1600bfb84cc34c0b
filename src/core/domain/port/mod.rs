mod command_executor;
mod resource_gateway;

pub use command_executor::CommandExecutor;
pub use resource_gateway::{ConfigParams, ResourceGateway};

#[cfg(test)]
pub use command_executor::MockCommandExecutor;
#[cfg(test)]
pub use resource_gateway::MockResourceGateway;
