// Shared transport configuration for building reqwest::Client instances.
//
// The device speaks plain HTTP on the local network, so there is no TLS
// or cookie handling here -- just timeout and user-agent settings shared
// by every client constructor.

use std::time::Duration;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout. The device serves from an ESP8266 and can be
    /// slow while a measurement cycle is running.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("aeromon/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
