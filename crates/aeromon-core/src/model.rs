// ── Domain model ──
//
// Plain immutable records. A `Snapshot` is the result of one successful
// poll; `DeviceIdentity` is the stable identity entities are grouped
// under. Neither type performs I/O.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, or mixed-case input.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// The immutable set of readings obtained from one successful poll.
///
/// Field keys are the firmware's `value_type` strings
/// (`"BME280_temperature"`, `"signal"`, ...). Readings are raw device
/// values -- projection and rounding happen in the entity layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    readings: BTreeMap<String, f64>,
    /// Firmware version reported alongside the readings.
    pub software_version: Option<String>,
}

impl Snapshot {
    pub fn new(readings: BTreeMap<String, f64>, software_version: Option<String>) -> Self {
        Self {
            readings,
            software_version,
        }
    }

    /// The raw reading for `key`, if the device reported it.
    pub fn reading(&self, key: &str) -> Option<f64> {
        self.readings.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.readings.contains_key(key)
    }

    /// Field keys present in this snapshot, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

// ── DeviceIdentity ──────────────────────────────────────────────────

/// Stable identity one device's entities are grouped under.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceIdentity {
    /// Stable identifier: the hardware MAC, or an explicitly configured
    /// unique id. Used as the prefix of every entity's unique id.
    pub unique_id: String,
    /// Hardware MAC, when the identifier was resolved from the device.
    pub mac: Option<MacAddress>,
    /// Display name for the logical device.
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    /// Firmware version from the latest setup-time snapshot.
    pub sw_version: Option<String>,
}

impl DeviceIdentity {
    pub const DEFAULT_NAME: &'static str = "Nettigo Air Monitor";

    /// Identity from a device-resolved MAC address.
    pub fn from_mac(mac: MacAddress, sw_version: Option<String>) -> Self {
        Self {
            unique_id: mac.as_str().to_owned(),
            mac: Some(mac),
            name: Self::DEFAULT_NAME.to_owned(),
            manufacturer: "Nettigo",
            model: "NAM Sensor",
            sw_version,
        }
    }

    /// Identity from an explicitly configured unique id.
    pub fn from_unique_id(unique_id: impl Into<String>, sw_version: Option<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            mac: None,
            name: Self::DEFAULT_NAME.to_owned(),
            manufacturer: "Nettigo",
            model: "NAM Sensor",
            sw_version,
        }
    }
}

// ── Value ───────────────────────────────────────────────────────────

/// A rendered entity value: a rounded measurement, or a derived instant
/// (the boot time computed from the uptime counter).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Measurement(f64),
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Measurement(v) => write!(f, "{v}"),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mac_address_normalizes_dashes() {
        let mac = MacAddress::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_normalizes_case() {
        let mac = MacAddress::new("AA:BB:CC:DD:EE:FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_address_from_str() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn snapshot_lookup() {
        let mut readings = BTreeMap::new();
        readings.insert("signal".to_owned(), -66.0);
        let snapshot = Snapshot::new(readings, None);

        assert_eq!(snapshot.reading("signal"), Some(-66.0));
        assert_eq!(snapshot.reading("missing"), None);
        assert!(snapshot.contains("signal"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn identity_from_mac_uses_mac_as_unique_id() {
        let identity = DeviceIdentity::from_mac(MacAddress::new("AA:BB:CC:DD:EE:FF"), None);
        assert_eq!(identity.unique_id, "aa:bb:cc:dd:ee:ff");
        assert_eq!(identity.name, "Nettigo Air Monitor");
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Measurement(21.4).to_string(), "21.4");
        assert_eq!(Value::Measurement(1003.0).to_string(), "1003");
    }
}
