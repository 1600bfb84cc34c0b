use crate::core::domain::{
    error::{ProxmoxResult, ValidationError},
    value_object::{proxmox_host::ProxmoxHost, proxmox_port::ProxmoxPort},
};

const API_PREFIX: &str = "api2/json";
const MAX_URL_LENGTH: usize = 2083;

/// Represents a validated Proxmox base URL (`scheme://host:port/`).
///
/// Combines ProxmoxHost and ProxmoxPort and knows how to derive the
/// `/api2/json/...` endpoint URLs from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxmoxUrl(String);

impl ProxmoxUrl {
    pub fn new(host: &ProxmoxHost, port: &ProxmoxPort, secure: bool) -> ProxmoxResult<Self> {
        let scheme = if secure { "https" } else { "http" };
        let url = format!("{}://{}:{}/", scheme, host.as_str(), port.get());
        validate_url(&url)?;
        Ok(Self(url))
    }

    /// Creates a new URL without validation.
    pub(crate) fn new_unchecked(url: String) -> Self {
        Self(url)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the full API URL for a path such as `nodes/pve1/qemu`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.0.trim_end_matches('/'),
            API_PREFIX,
            path.trim_start_matches('/')
        )
    }
}

/// Validates a base URL.
pub(crate) fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::field("url", "URL cannot be empty"));
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::Format(format!(
            "URL exceeds maximum length of {} characters",
            MAX_URL_LENGTH
        )));
    }

    let parsed = url::Url::parse(url)
        .map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::ConstraintViolation(
            "Invalid scheme. Must be one of: http, https".to_string(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(ValidationError::field("url", "URL must contain a host"));
    }

    Ok(())
}
