//! `aeromon mac` -- print the device MAC address.

use aeromon_api::DeviceClient;
use aeromon_api::transport::TransportConfig;
use aeromon_core::{CoreError, DeviceConfig};

use crate::error::CliError;

pub async fn handle(device: DeviceConfig) -> Result<(), CliError> {
    let transport = TransportConfig {
        timeout: device.request_timeout,
    };
    let client = DeviceClient::new(&device.host, &transport)
        .map_err(|e| CliError::from(CoreError::from(e)))?;

    let mac = client
        .mac_address()
        .await
        .map_err(|e| CliError::from(CoreError::from(e)))?;

    println!("{mac}");
    Ok(())
}
