//! `aeromon sensors` -- poll once and list the adapted entities.

use aeromon_core::{DeviceConfig, PollState, SensorEntity, setup};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, SensorRow};

pub async fn handle(device: DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let context = setup(device).await.map_err(CliError::from)?;

    let state = context.coordinator.state();
    let mut rows: Vec<SensorRow> = context
        .sensors
        .iter()
        .map(|entity| sensor_row(entity, &state))
        .collect();

    if let Some(ref air_quality) = context.air_quality {
        rows.push(SensorRow {
            name: air_quality.display_name().to_owned(),
            value: air_quality
                .particulate_matter_10(&state)
                .map_or_else(|| "-".to_owned(), |v| format!("PM10 {v}")),
            unit: String::new(),
            available: output::availability(air_quality.available(&state)),
            key: "air_quality".to_owned(),
        });
    }

    println!("{}", output::render_rows(&global.output, &rows)?);

    context.unload().await;
    Ok(())
}

fn sensor_row(entity: &SensorEntity, state: &PollState) -> SensorRow {
    SensorRow {
        name: entity.display_name().to_owned(),
        value: entity
            .value(state)
            .map_or_else(|| "-".to_owned(), |v| v.to_string()),
        unit: entity.unit().unwrap_or_default().to_owned(),
        available: output::availability(entity.available(state)),
        key: entity.key().to_owned(),
    }
}
