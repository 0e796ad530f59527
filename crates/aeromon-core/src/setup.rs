// ── Device setup lifecycle ──
//
// Sequencing for bringing one device online: resolve its stable
// identifier, perform the eager first poll, derive the entity set, and
// start the background refresh task. Failure classification matters
// here -- `DeviceUnsupported` aborts, `NotReady` asks the caller to
// retry setup later, `PollFailed` never escapes this module.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use aeromon_api::DeviceClient;
use aeromon_api::transport::TransportConfig;

use crate::config::{DeviceConfig, SETUP_TIMEOUT};
use crate::coordinator::{Coordinator, refresh_task};
use crate::entity::{AirQualityEntity, SensorEntity, build_sensor_entities};
use crate::error::CoreError;
use crate::model::{DeviceIdentity, MacAddress};

/// Host pre-filled by zeroconf discovery, awaiting one accept step.
#[derive(Debug, Clone)]
pub struct DiscoveryInfo {
    pub host: String,
    /// Advertised instance name, if any.
    pub name: Option<String>,
}

impl DeviceConfig {
    /// Confirm a discovered device: validates the advertised host the
    /// same way a hand-entered one is validated.
    pub fn from_discovery(info: DiscoveryInfo) -> Result<Self, CoreError> {
        Self::new(info.host)
    }
}

/// Everything a consumer needs to serve one configured device.
///
/// The context owns the coordinator and the refresh task; dropping it
/// without calling [`unload`](Self::unload) aborts neither -- teardown
/// is explicit, matching the configuration-removal flow.
#[derive(Debug)]
pub struct DeviceContext {
    pub config: DeviceConfig,
    pub identity: DeviceIdentity,
    pub coordinator: Arc<Coordinator>,
    pub sensors: Vec<SensorEntity>,
    pub air_quality: Option<AirQualityEntity>,
    cancel: CancellationToken,
    refresh_handle: JoinHandle<()>,
}

impl DeviceContext {
    /// Stop polling and release the device.
    ///
    /// Cancels the refresh task and waits for it to finish; an in-flight
    /// poll is allowed to complete.
    pub async fn unload(self) {
        self.cancel.cancel();
        if let Err(err) = self.refresh_handle.await {
            warn!(error = %err, "refresh task did not shut down cleanly");
        }
        debug!("device unloaded");
    }
}

/// Set up a device from its configuration.
///
/// Builds the HTTP client for `config.host` and delegates to
/// [`setup_with_client`].
pub async fn setup(config: DeviceConfig) -> Result<DeviceContext, CoreError> {
    let transport = TransportConfig {
        timeout: config.request_timeout,
    };
    let client = DeviceClient::new(&config.host, &transport)?;
    setup_with_client(config, client).await
}

/// Set up a device using a caller-supplied client.
///
/// The client seam exists for tests and for embedders that need custom
/// transport settings; behavior is identical to [`setup`].
pub async fn setup_with_client(
    config: DeviceConfig,
    client: DeviceClient,
) -> Result<DeviceContext, CoreError> {
    // 1. Stable identifier: configured override, or the device's MAC.
    let (unique_id, mac) = match &config.unique_id {
        Some(id) => (id.clone(), None),
        None => {
            let raw = resolve_mac(&client).await?;
            let mac = MacAddress::new(raw);
            (mac.as_str().to_owned(), Some(mac))
        }
    };

    // 2. Eager first poll. Failure here means "not ready yet", not
    //    "broken" -- the caller retries setup later.
    let coordinator = Arc::new(Coordinator::new(client, config.request_timeout));
    let snapshot = match coordinator.refresh().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(host = %config.host, error = %err, "initial poll failed");
            return Err(CoreError::NotReady {
                host: config.host.clone(),
            });
        }
    };

    // 3. Entity set, fixed for the lifetime of this context.
    let identity = match mac {
        Some(mac) => DeviceIdentity::from_mac(mac, snapshot.software_version.clone()),
        None => DeviceIdentity::from_unique_id(unique_id, snapshot.software_version.clone()),
    };
    let sensors = build_sensor_entities(&snapshot, &identity);
    let air_quality = AirQualityEntity::from_snapshot(&snapshot, &identity);

    // 4. Background refresh.
    let cancel = CancellationToken::new();
    let refresh_handle = tokio::spawn(refresh_task(
        Arc::clone(&coordinator),
        config.update_interval,
        cancel.clone(),
    ));

    info!(
        host = %config.host,
        unique_id = %identity.unique_id,
        sensors = sensors.len(),
        air_quality = air_quality.is_some(),
        "device setup complete"
    );

    Ok(DeviceContext {
        config,
        identity,
        coordinator,
        sensors,
        air_quality,
        cancel,
        refresh_handle,
    })
}

/// Read the device MAC under the setup timeout.
async fn resolve_mac(client: &DeviceClient) -> Result<String, CoreError> {
    match tokio::time::timeout(SETUP_TIMEOUT, client.mac_address()).await {
        Ok(Ok(mac)) => Ok(mac),
        // CannotGetMac maps to DeviceUnsupported, transport errors to
        // CannotConnect.
        Ok(Err(err)) => Err(err.into()),
        Err(_) => Err(CoreError::CannotConnect {
            reason: format!("timed out after {}s", SETUP_TIMEOUT.as_secs()),
        }),
    }
}
