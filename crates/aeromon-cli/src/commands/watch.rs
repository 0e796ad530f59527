//! `aeromon watch` -- keep polling and print every refresh.

use std::time::Duration;

use chrono::Utc;
use tracing::info;

use aeromon_core::{DeviceConfig, setup};

use crate::error::CliError;

pub async fn handle(device: DeviceConfig, interval: Duration) -> Result<(), CliError> {
    let device = device.with_update_interval(interval);
    let context = setup(device).await.map_err(CliError::from)?;
    info!(
        host = %context.config.host,
        interval = ?interval,
        "watching; press Ctrl-C to stop"
    );

    let mut rx = context.coordinator.subscribe();
    print_refresh(&context);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_refresh(&context);
            }
        }
    }

    context.unload().await;
    Ok(())
}

fn print_refresh(context: &aeromon_core::DeviceContext) {
    let state = context.coordinator.state();
    let stamp = Utc::now().format("%H:%M:%S");

    if !state.last_update_success {
        println!("[{stamp}] poll failed; values are stale");
        return;
    }

    let values: Vec<String> = context
        .sensors
        .iter()
        .filter(|entity| entity.available(&state))
        .filter_map(|entity| {
            entity
                .value(&state)
                .map(|value| format!("{}={value}", entity.key()))
        })
        .collect();
    println!("[{stamp}] {}", values.join("  "));
}
