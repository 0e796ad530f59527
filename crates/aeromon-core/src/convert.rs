// ── Wire payload → domain Snapshot ──
//
// The firmware reports every reading as a string. Parsing happens here,
// per field, so one malformed value is dropped instead of failing the
// whole poll. The top-level uptime counter joins the readings under the
// `"uptime"` key so the entity layer sees a uniform keyed mapping.

use std::collections::BTreeMap;

use tracing::debug;

use aeromon_api::DataResponse;

use crate::model::Snapshot;

/// Convert one `/data.json` payload into a [`Snapshot`].
pub fn snapshot_from_data(data: DataResponse) -> Snapshot {
    let mut readings = BTreeMap::new();

    for reading in data.sensordatavalues {
        match reading.value.trim().parse::<f64>() {
            Ok(value) => {
                readings.insert(reading.value_type, value);
            }
            Err(_) => {
                debug!(
                    field = %reading.value_type,
                    raw = %reading.value,
                    "skipping non-numeric reading"
                );
            }
        }
    }

    if let Some(uptime) = data.uptime {
        // The counter fits f64 exactly for any realistic uptime.
        #[allow(clippy::cast_precision_loss)]
        readings.insert("uptime".to_owned(), uptime as f64);
    }

    Snapshot::new(readings, data.software_version)
}
