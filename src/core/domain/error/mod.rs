use crate::core::domain::model::resource::ResourceKind;
use std::time::Duration;
use thiserror::Error;

/// The main error type for Proxmox orchestration operations.
///
/// Each variant renders as a single actionable line so the outermost
/// caller can print it verbatim and exit with a non-zero status.
#[derive(Error, Debug)]
pub enum ProxmoxError {
    /// The HTTP request could not be sent or its body could not be read.
    ///
    /// # Fields
    /// * `context` - What the client was doing when the transport failed
    /// * `source` - The underlying reqwest error
    #[error("Transport error while {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success HTTP status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API token was rejected (HTTP 401/403).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Represents validation failures of configuration or API payloads
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The referenced id does not exist in the queried kind's collection.
    #[error("{kind} {vmid} not found")]
    NotFound { kind: ResourceKind, vmid: u32 },

    /// The resource exists but its IPv4 address cannot be obtained right now.
    #[error(
        "{kind} {vmid} has no reachable IPv4 address (is it running and is the guest agent installed?)"
    )]
    Unavailable { kind: ResourceKind, vmid: u32 },

    /// A polled task stopped with an exit status other than `OK`.
    #[error("Task {upid} failed: {exit_status}")]
    TaskFailed { upid: String, exit_status: String },

    /// A polled task did not finish within the allotted time.
    #[error("Task {upid} did not finish within {}s", timeout.as_secs())]
    Timeout { upid: String, timeout: Duration },

    /// Neither the IP nor the FQDN strategy yielded a connection target.
    #[error(
        "Could not resolve {kind} {vmid} by IP or FQDN; check that the resource is running, the guest agent is installed and DNS is configured"
    )]
    BothStrategiesFailed { kind: ResourceKind, vmid: u32 },

    /// Spawning a local process failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxmoxError {
    /// Returns true for [`ProxmoxError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProxmoxError::NotFound { .. })
    }

    /// Returns true for [`ProxmoxError::Unavailable`].
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProxmoxError::Unavailable { .. })
    }
}

/// Specialized error type for validation failures.
///
/// This enum provides detailed context about why a validation
/// failed, including field-specific errors and format violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Type alias for Results that may fail with a ProxmoxError
pub type ProxmoxResult<T> = Result<T, ProxmoxError>;
