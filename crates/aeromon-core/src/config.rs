// ── Runtime device configuration ──
//
// These types describe *which* device to poll and how often. They are
// handed in by the consumer (CLI, embedding host) and never touch disk.
// The host string is validated here, before any network I/O happens.

use std::net::IpAddr;
use std::time::Duration;

use crate::error::CoreError;

/// How often the coordinator polls the device.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(300);

/// Bound on a single poll request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on configuration-time requests (MAC discovery during setup).
pub const SETUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for one monitored device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device host: IP literal or DNS-constrained hostname, no scheme.
    pub host: String,
    /// Stable identifier override. When absent, setup resolves the
    /// device's MAC address and uses that.
    pub unique_id: Option<String>,
    /// Poll period for the background refresh task.
    pub update_interval: Duration,
    /// Per-request timeout for polls.
    pub request_timeout: Duration,
}

impl DeviceConfig {
    /// Build a config with default timings, validating `host` up front.
    pub fn new(host: impl Into<String>) -> Result<Self, CoreError> {
        let host = host.into();
        if !validate_host(&host) {
            return Err(CoreError::InvalidHost { host });
        }
        Ok(Self {
            host,
            unique_id: None,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set an explicit unique id instead of resolving the device MAC.
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Override the poll period.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Override the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Validate a host string: an IP literal, or a hostname of DNS labels
/// (1-63 alphanumeric/hyphen characters each, no leading or trailing
/// hyphen, at most 253 characters overall).
pub fn validate_host(host: &str) -> bool {
    if host.parse::<IpAddr>().is_ok() {
        return true;
    }
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(valid_dns_label)
}

fn valid_dns_label(label: &str) -> bool {
    if label.is_empty() || label.len() > 63 {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ipv4_literal() {
        assert!(validate_host("192.168.1.5"));
    }

    #[test]
    fn accepts_ipv6_literal() {
        assert!(validate_host("fe80::1"));
    }

    #[test]
    fn accepts_mdns_hostname() {
        assert!(validate_host("device.local"));
        assert!(validate_host("nam-workshop.local"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(!validate_host("not a host!"));
        assert!(!validate_host(""));
        assert!(!validate_host("http://device.local"));
        assert!(!validate_host("bad_label.local"));
        assert!(!validate_host("-leading.local"));
        assert!(!validate_host("trailing-.local"));
    }

    #[test]
    fn rejects_overlong_names() {
        let label = "a".repeat(64);
        assert!(!validate_host(&label));
        let name = ["a".repeat(63).as_str(); 5].join(".");
        assert!(!validate_host(&name));
    }

    #[test]
    fn config_rejects_invalid_host_before_any_io() {
        let err = DeviceConfig::new("not a host!").unwrap_err();
        assert!(matches!(err, CoreError::InvalidHost { host } if host == "not a host!"));
    }

    #[test]
    fn config_defaults() {
        let config = DeviceConfig::new("device.local").unwrap();
        assert_eq!(config.update_interval, Duration::from_secs(300));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.unique_id.is_none());
    }
}
