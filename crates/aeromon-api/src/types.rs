// Wire types for the device's `/data.json` endpoint.
//
// The firmware reports every reading as a string inside the
// `sensordatavalues` array; numeric parsing is left to the consumer so
// that one malformed reading never fails the whole payload.

use serde::Deserialize;

/// One raw reading as reported by the firmware.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorDataValue {
    /// Field key, e.g. `"BME280_temperature"` or `"signal"`.
    pub value_type: String,
    /// Reading rendered as a string by the firmware (`"22.73"`, `"-66"`).
    pub value: String,
}

/// Full `/data.json` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse {
    /// Firmware version string, e.g. `"NAMF-2020-36"`.
    pub software_version: Option<String>,

    /// Seconds since the last measurement cycle, as a string.
    pub age: Option<String>,

    /// Seconds since boot. Not present on all firmware revisions.
    pub uptime: Option<u64>,

    /// The measurement array. Defaults to empty right after boot, when
    /// the firmware has not completed a cycle yet.
    #[serde(default)]
    pub sensordatavalues: Vec<SensorDataValue>,
}
