//! `aeromon status` -- one poll, device summary.

use std::time::Duration;

use aeromon_api::DeviceClient;
use aeromon_api::transport::TransportConfig;
use aeromon_core::{Coordinator, DeviceConfig, Value};

use crate::error::CliError;

pub async fn handle(device: DeviceConfig) -> Result<(), CliError> {
    let transport = TransportConfig {
        timeout: device.request_timeout,
    };
    let client = DeviceClient::new(&device.host, &transport)
        .map_err(|e| CliError::from(aeromon_core::CoreError::from(e)))?;

    let coordinator = Coordinator::new(client, device.request_timeout);
    let snapshot = coordinator.refresh().await.map_err(CliError::from)?;

    println!("host:      {}", device.host);
    println!(
        "firmware:  {}",
        snapshot.software_version.as_deref().unwrap_or("unknown")
    );
    if let Some(uptime) = snapshot.reading("uptime") {
        let booted = aeromon_core::fields::boot_time(uptime, chrono::Utc::now());
        println!("booted:    {}", Value::Timestamp(booted));
        println!("uptime:    {}", format_uptime(uptime));
    }
    if let Some(signal) = snapshot.reading("signal") {
        println!("signal:    {signal} dBm");
    }
    println!("readings:  {}", snapshot.len());

    Ok(())
}

fn format_uptime(uptime_secs: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let secs = uptime_secs.max(0.0) as u64;
    humantime::format_duration(Duration::from_secs(secs)).to_string()
}
