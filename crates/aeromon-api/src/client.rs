// Device HTTP client
//
// Wraps `reqwest::Client` with the two endpoints the firmware exposes:
// `/data.json` for measurements and `/values` for the status page that
// carries the MAC address. The device is a plain-HTTP LAN service with
// no authentication, so the client is little more than URL construction
// and status/decoding checks.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::DataResponse;

/// MAC address token as rendered on the `/values` status page.
static MAC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9a-f]{2}(?::[0-9a-f]{2}){5}").expect("static pattern"));

/// Raw HTTP client for one Nettigo Air Monitor device.
///
/// Holds the base URL (`http://{host}/`) and a reqwest client reused
/// across polls. All methods are single request-response calls; retry
/// policy belongs to the caller.
#[derive(Debug)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a client for `host` (hostname or IP literal, no scheme).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}/"))?;
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client from a full base URL and a pre-built `reqwest::Client`.
    ///
    /// Used by tests to point the client at a mock server.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current measurement payload from `/data.json`.
    pub async fn data(&self) -> Result<DataResponse, Error> {
        let url = self.base_url.join("data.json")?;
        debug!(%url, "fetching measurements");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        trace!(len = body.len(), "received measurement body");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Read the device MAC address from the `/values` status page.
    ///
    /// The page is HTML; the first MAC-shaped token on it is the WiFi
    /// interface address. Firmware builds without the status page (or
    /// with it disabled) yield [`Error::CannotGetMac`].
    pub async fn mac_address(&self) -> Result<String, Error> {
        let url = self.base_url.join("values")?;
        debug!(%url, "reading MAC address");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        MAC_RE
            .find(&body)
            .map(|m| m.as_str().to_lowercase())
            .ok_or(Error::CannotGetMac)
    }
}
