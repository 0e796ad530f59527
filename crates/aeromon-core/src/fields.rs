// ── Field metadata table ──
//
// Static, process-wide mapping from firmware field keys to display
// metadata and projection rules. One canonical table: uptime and CO2
// included, signal strength and uptime disabled by default, pressure
// reported by the device in Pa and displayed in hPa.

use chrono::{DateTime, Utc};

use crate::model::Value;

/// Semantic class of a field, for consumers that group or style by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Humidity,
    Pressure,
    SignalStrength,
    Temperature,
    Timestamp,
}

/// How a raw reading is projected into a displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Round to one decimal place.
    OneDecimal,
    /// Divide by 100 (Pa -> hPa) and round to an integer.
    WholeHectopascals,
    /// Treat the reading as seconds-since-boot and derive the boot
    /// instant, truncated to whole seconds.
    BootTimestamp,
}

impl ValueFormat {
    /// Project a raw reading, evaluated at `now`.
    pub fn render(self, raw: f64, now: DateTime<Utc>) -> Value {
        match self {
            Self::OneDecimal => Value::Measurement(round1(raw)),
            Self::WholeHectopascals => Value::Measurement((raw / 100.0).round()),
            Self::BootTimestamp => Value::Timestamp(boot_time(raw, now)),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// The instant the device booted: `now` minus the uptime counter, with
/// sub-second precision truncated.
pub fn boot_time(uptime_secs: f64, now: DateTime<Utc>) -> DateTime<Utc> {
    #[allow(clippy::cast_possible_truncation)]
    let booted = now.timestamp() - uptime_secs as i64;
    DateTime::from_timestamp(booted, 0).unwrap_or(now)
}

/// Display metadata and projection rule for one field key.
#[derive(Debug)]
pub struct FieldSpec {
    /// Firmware field key (`value_type`).
    pub key: &'static str,
    /// Short display name, composed after the device name.
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub icon: Option<&'static str>,
    /// Whether a consumer should surface this entity without being asked.
    pub enabled_by_default: bool,
    pub format: ValueFormat,
}

const MICROGRAMS_PER_CUBIC_METER: &str = "\u{b5}g/m\u{b3}";
const CELSIUS: &str = "\u{b0}C";

macro_rules! field {
    ($key:literal, $name:literal, $unit:expr, $class:expr, $icon:expr, $enabled:literal, $format:expr) => {
        FieldSpec {
            key: $key,
            name: $name,
            unit: $unit,
            device_class: $class,
            icon: $icon,
            enabled_by_default: $enabled,
            format: $format,
        }
    };
}

/// Every field the adapter knows how to present, in display order.
#[rustfmt::skip]
pub static FIELDS: &[FieldSpec] = &[
    field!("BME280_humidity", "BME280 Humidity", Some("%"), Some(DeviceClass::Humidity), None, true, ValueFormat::OneDecimal),
    field!("BME280_pressure", "BME280 Pressure", Some("hPa"), Some(DeviceClass::Pressure), None, true, ValueFormat::WholeHectopascals),
    field!("BME280_temperature", "BME280 Temperature", Some(CELSIUS), Some(DeviceClass::Temperature), None, true, ValueFormat::OneDecimal),
    field!("BMP280_pressure", "BMP280 Pressure", Some("hPa"), Some(DeviceClass::Pressure), None, true, ValueFormat::WholeHectopascals),
    field!("BMP280_temperature", "BMP280 Temperature", Some(CELSIUS), Some(DeviceClass::Temperature), None, true, ValueFormat::OneDecimal),
    field!("HECA_humidity", "HECA Humidity", Some("%"), Some(DeviceClass::Humidity), None, true, ValueFormat::OneDecimal),
    field!("HECA_temperature", "HECA Temperature", Some(CELSIUS), Some(DeviceClass::Temperature), None, true, ValueFormat::OneDecimal),
    field!("SHT3X_humidity", "SHT3X Humidity", Some("%"), Some(DeviceClass::Humidity), None, true, ValueFormat::OneDecimal),
    field!("SHT3X_temperature", "SHT3X Temperature", Some(CELSIUS), Some(DeviceClass::Temperature), None, true, ValueFormat::OneDecimal),
    field!("humidity", "DHT22 Humidity", Some("%"), Some(DeviceClass::Humidity), None, true, ValueFormat::OneDecimal),
    field!("temperature", "DHT22 Temperature", Some(CELSIUS), Some(DeviceClass::Temperature), None, true, ValueFormat::OneDecimal),
    field!("SDS_P1", "SDS Particulate Matter 10", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("SDS_P2", "SDS Particulate Matter 2.5", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("SPS30_P0", "SPS30 Particulate Matter 1.0", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("SPS30_P1", "SPS30 Particulate Matter 10", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("SPS30_P2", "SPS30 Particulate Matter 2.5", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("SPS30_P4", "SPS30 Particulate Matter 4.0", Some(MICROGRAMS_PER_CUBIC_METER), None, Some("mdi:blur"), true, ValueFormat::OneDecimal),
    field!("conc_co2_ppm", "CO2", Some("ppm"), None, Some("mdi:molecule-co2"), true, ValueFormat::OneDecimal),
    field!("signal", "Signal Strength", Some("dBm"), Some(DeviceClass::SignalStrength), None, false, ValueFormat::OneDecimal),
    field!("uptime", "Uptime", None, Some(DeviceClass::Timestamp), None, false, ValueFormat::BootTimestamp),
];

/// Metadata for `key`, if the table knows it.
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn one_decimal_rounding() {
        let now = Utc::now();
        assert_eq!(
            ValueFormat::OneDecimal.render(21.37, now),
            Value::Measurement(21.4)
        );
        assert_eq!(
            ValueFormat::OneDecimal.render(-66.0, now),
            Value::Measurement(-66.0)
        );
    }

    #[test]
    fn pressure_rescaled_to_whole_hectopascals() {
        let now = Utc::now();
        assert_eq!(
            ValueFormat::WholeHectopascals.render(100325.0, now),
            Value::Measurement(1003.0)
        );
        assert_eq!(
            ValueFormat::WholeHectopascals.render(100325.19, now),
            Value::Measurement(1003.0)
        );
    }

    #[test]
    fn uptime_projects_to_boot_instant() {
        let now = Utc.with_ymd_and_hms(2021, 5, 19, 12, 0, 0).unwrap();
        let booted = boot_time(3600.0, now);

        assert_eq!(booted, Utc.with_ymd_and_hms(2021, 5, 19, 11, 0, 0).unwrap());
        assert_eq!(booted.timestamp_subsec_micros(), 0);
    }

    #[test]
    fn uptime_truncates_subsecond_precision() {
        let now = Utc
            .timestamp_opt(1_621_425_600, 123_456_789)
            .single()
            .unwrap();
        let booted = boot_time(60.0, now);

        assert_eq!(booted.timestamp(), 1_621_425_540);
        assert_eq!(booted.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn table_lookup() {
        let spec = field_spec("BME280_pressure").unwrap();
        assert_eq!(spec.unit, Some("hPa"));
        assert_eq!(spec.format, ValueFormat::WholeHectopascals);

        assert!(field_spec("samples").is_none());
    }

    #[test]
    fn signal_and_uptime_disabled_by_default() {
        assert!(!field_spec("signal").unwrap().enabled_by_default);
        assert!(!field_spec("uptime").unwrap().enabled_by_default);
        assert!(field_spec("BME280_temperature").unwrap().enabled_by_default);
    }

    #[test]
    fn table_keys_are_unique() {
        for (i, spec) in FIELDS.iter().enumerate() {
            assert!(
                FIELDS.iter().skip(i + 1).all(|other| other.key != spec.key),
                "duplicate key {}",
                spec.key
            );
        }
    }
}
