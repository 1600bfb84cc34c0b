//! Non-connection client settings.

use std::time::Duration;

/// DNS suffix appended to a resource name for the FQDN fallback.
pub const DEFAULT_DNS_SUFFIX: &str = "home.sflab.io";
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_TASK_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client-side rate limit applied to every API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Read-only settings shared by every call made through one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `None` disables rate limiting.
    pub rate_limit: Option<RateLimitConfig>,
    pub dns_suffix: String,
    pub task_timeout: Duration,
    pub task_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rate_limit: None,
            dns_suffix: DEFAULT_DNS_SUFFIX.to_string(),
            task_timeout: DEFAULT_TASK_TIMEOUT,
            task_poll_interval: DEFAULT_TASK_POLL_INTERVAL,
        }
    }
}
