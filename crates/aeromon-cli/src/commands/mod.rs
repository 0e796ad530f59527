//! Command handlers, one module per subcommand.

pub mod mac;
pub mod sensors;
pub mod status;
pub mod watch;

use std::time::Duration;

use aeromon_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

/// Build a validated `DeviceConfig` from flags, env, and the config file.
pub fn device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let file = config::load()?;
    let host = config::resolve_host(global, &file)?;

    let mut device = DeviceConfig::new(host)
        .map_err(CliError::from)?
        .with_request_timeout(Duration::from_secs(global.timeout));
    if let Some(ref unique_id) = global.unique_id {
        device = device.with_unique_id(unique_id.clone());
    }
    Ok(device)
}
