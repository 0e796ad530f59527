// ── Entity adaptation ──
//
// Entities are plain immutable records bound to one field key and one
// device identity. Values are pure projections over the coordinator's
// current PollState -- no entity performs its own I/O or caches data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::coordinator::PollState;
use crate::fields::{self, DeviceClass, FieldSpec, ValueFormat};
use crate::model::{DeviceIdentity, Snapshot, Value};

/// Particulate sensor families the composite entity aggregates, in
/// preference order.
pub const PARTICULATE_FAMILIES: [&str; 2] = ["SDS", "SPS30"];

// ── SensorEntity ────────────────────────────────────────────────────

/// One named, derived view of a single field.
#[derive(Debug, Clone, Serialize)]
pub struct SensorEntity {
    key: String,
    display_name: String,
    unique_id: String,
    #[serde(skip)]
    spec: Option<&'static FieldSpec>,
}

impl SensorEntity {
    /// Bind a field key to a device identity.
    ///
    /// Keys missing from the metadata table still get an entity, with a
    /// name concatenated from the device name and the key, a default
    /// one-decimal projection, and no unit or class.
    pub fn new(key: impl Into<String>, identity: &DeviceIdentity) -> Self {
        let key = key.into();
        let spec = fields::field_spec(&key);
        let display_name = match spec {
            Some(spec) => format!("{} {}", identity.name, spec.name),
            None => format!("{} {}", identity.name, key),
        };
        let unique_id = format!("{}-{}", identity.unique_id, key).to_lowercase();
        Self {
            key,
            display_name,
            unique_id,
            spec,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Globally unique entity key: `"{device unique id}-{field key}"`,
    /// lowercased.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn unit(&self) -> Option<&'static str> {
        self.spec.and_then(|spec| spec.unit)
    }

    pub fn device_class(&self) -> Option<DeviceClass> {
        self.spec.and_then(|spec| spec.device_class)
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.spec.and_then(|spec| spec.icon)
    }

    /// Whether a consumer should surface this entity without being asked.
    pub fn enabled_by_default(&self) -> bool {
        self.spec.is_none_or(|spec| spec.enabled_by_default)
    }

    /// The projected value from the latest snapshot, evaluated now.
    pub fn value(&self, state: &PollState) -> Option<Value> {
        self.value_at(state, Utc::now())
    }

    /// The projected value, evaluated at an explicit instant (the
    /// instant only matters for the uptime projection).
    pub fn value_at(&self, state: &PollState, now: DateTime<Utc>) -> Option<Value> {
        let snapshot = state.snapshot.as_ref()?;
        let raw = snapshot.reading(&self.key)?;
        let format = self.spec.map_or(ValueFormat::OneDecimal, |spec| spec.format);
        Some(format.render(raw, now))
    }

    /// True only if the last poll succeeded and the field currently has
    /// a non-zero value. Shortly after boot the device omits or zeroes
    /// fields it has not measured yet.
    pub fn available(&self, state: &PollState) -> bool {
        state.last_update_success
            && state
                .snapshot
                .as_ref()
                .and_then(|snapshot| snapshot.reading(&self.key))
                .is_some_and(|raw| raw != 0.0)
    }
}

/// One entity per metadata-table field present in `snapshot`, in table
/// order. Fields appearing only in later polls do not get entities --
/// the set is fixed until the device is set up again.
pub fn build_sensor_entities(snapshot: &Snapshot, identity: &DeviceIdentity) -> Vec<SensorEntity> {
    fields::FIELDS
        .iter()
        .filter(|spec| snapshot.contains(spec.key))
        .map(|spec| SensorEntity::new(spec.key, identity))
        .collect()
}

// ── AirQualityEntity ────────────────────────────────────────────────

/// Composite particulate-matter view.
///
/// The SDS and SPS30 families report the same physical quantities under
/// different keys. Per quantity, the SDS reading wins; SPS30 fills in
/// when SDS is absent. Values are rounded to whole micrograms.
#[derive(Debug, Clone, Serialize)]
pub struct AirQualityEntity {
    display_name: String,
    unique_id: String,
}

impl AirQualityEntity {
    /// Build the composite entity, if any family reports PM10 in the
    /// setup-time snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, identity: &DeviceIdentity) -> Option<Self> {
        let reported = PARTICULATE_FAMILIES
            .iter()
            .any(|family| snapshot.contains(&format!("{family}_P1")));
        reported.then(|| Self {
            display_name: format!("{} Air Quality", identity.name),
            unique_id: format!("{}-air_quality", identity.unique_id).to_lowercase(),
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// PM10 level (the families' `*_P1` field).
    pub fn particulate_matter_10(&self, state: &PollState) -> Option<f64> {
        Self::preferred(state, "P1")
    }

    /// PM2.5 level (the families' `*_P2` field).
    pub fn particulate_matter_2_5(&self, state: &PollState) -> Option<f64> {
        Self::preferred(state, "P2")
    }

    /// CO2 concentration, when a CO2 sensor is attached.
    pub fn carbon_dioxide(&self, state: &PollState) -> Option<f64> {
        let snapshot = state.snapshot.as_ref()?;
        snapshot.reading("conc_co2_ppm").map(f64::round)
    }

    /// True only if the last poll succeeded and some particulate family
    /// is currently reporting.
    pub fn available(&self, state: &PollState) -> bool {
        state.last_update_success
            && state.snapshot.as_ref().is_some_and(|snapshot| {
                PARTICULATE_FAMILIES
                    .iter()
                    .any(|family| snapshot.contains(&format!("{family}_P1")))
            })
    }

    /// First family reporting `suffix`, in preference order.
    fn preferred(state: &PollState, suffix: &str) -> Option<f64> {
        let snapshot = state.snapshot.as_ref()?;
        PARTICULATE_FAMILIES
            .iter()
            .find_map(|family| snapshot.reading(&format!("{family}_{suffix}")))
            .map(f64::round)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use chrono::TimeZone;

    use crate::model::MacAddress;

    use super::*;

    fn identity() -> DeviceIdentity {
        DeviceIdentity::from_mac(MacAddress::new("AA:BB:CC:DD:EE:FF"), None)
    }

    fn snapshot(pairs: &[(&str, f64)]) -> Snapshot {
        let readings: BTreeMap<String, f64> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), *v))
            .collect();
        Snapshot::new(readings, None)
    }

    fn state(pairs: &[(&str, f64)]) -> PollState {
        PollState {
            snapshot: Some(Arc::new(snapshot(pairs))),
            last_update_success: true,
        }
    }

    #[test]
    fn generic_field_rounds_to_one_decimal() {
        let state = state(&[("BME280_temperature", 21.37)]);
        let entity = SensorEntity::new("BME280_temperature", &identity());

        assert_eq!(entity.value(&state), Some(Value::Measurement(21.4)));
    }

    #[test]
    fn pressure_field_rescales_to_hectopascals() {
        let state = state(&[("BME280_pressure", 100325.0)]);
        let entity = SensorEntity::new("BME280_pressure", &identity());

        assert_eq!(entity.value(&state), Some(Value::Measurement(1003.0)));
    }

    #[test]
    fn uptime_field_projects_boot_instant() {
        let state = state(&[("uptime", 3600.0)]);
        let entity = SensorEntity::new("uptime", &identity());
        let now = Utc.with_ymd_and_hms(2021, 5, 19, 12, 0, 0).unwrap();

        let value = entity.value_at(&state, now);
        let expected = Utc.with_ymd_and_hms(2021, 5, 19, 11, 0, 0).unwrap();
        assert_eq!(value, Some(Value::Timestamp(expected)));
    }

    #[test]
    fn unique_id_is_mac_plus_key_lowercased() {
        let entity = SensorEntity::new("SDS_P1", &identity());
        assert_eq!(entity.unique_id(), "aa:bb:cc:dd:ee:ff-sds_p1");
    }

    #[test]
    fn display_name_prefixes_device_name() {
        let entity = SensorEntity::new("BME280_humidity", &identity());
        assert_eq!(
            entity.display_name(),
            "Nettigo Air Monitor BME280 Humidity"
        );
    }

    #[test]
    fn unknown_key_falls_back_to_key_concatenation() {
        let entity = SensorEntity::new("samples", &identity());
        assert_eq!(entity.display_name(), "Nettigo Air Monitor samples");
        assert_eq!(entity.unit(), None);
        assert!(entity.enabled_by_default());
    }

    #[test]
    fn unavailable_when_last_poll_failed() {
        let mut state = state(&[("BME280_temperature", 21.37)]);
        state.last_update_success = false;

        let entity = SensorEntity::new("BME280_temperature", &identity());
        assert!(!entity.available(&state));
        // The stale value itself is still readable.
        assert!(entity.value(&state).is_some());
    }

    #[test]
    fn unavailable_when_field_missing_or_zero() {
        let state = state(&[("BME280_temperature", 21.37), ("signal", 0.0)]);

        let present = SensorEntity::new("BME280_temperature", &identity());
        let zeroed = SensorEntity::new("signal", &identity());
        let missing = SensorEntity::new("humidity", &identity());

        assert!(present.available(&state));
        assert!(!zeroed.available(&state));
        assert!(!missing.available(&state));
    }

    #[test]
    fn builds_entities_only_for_observed_fields() {
        let snapshot = snapshot(&[("BME280_temperature", 21.4), ("signal", -66.0)]);
        let entities = build_sensor_entities(&snapshot, &identity());

        let keys: Vec<&str> = entities.iter().map(SensorEntity::key).collect();
        assert_eq!(keys, vec!["BME280_temperature", "signal"]);
    }

    #[test]
    fn composite_prefers_sds_over_sps30() {
        let state = state(&[("SDS_P1", 12.0), ("SPS30_P1", 9.0)]);
        let entity = AirQualityEntity::from_snapshot(
            state.snapshot.as_ref().unwrap(),
            &identity(),
        )
        .unwrap();

        assert_eq!(entity.particulate_matter_10(&state), Some(12.0));
    }

    #[test]
    fn composite_falls_back_to_sps30() {
        let state = state(&[("SPS30_P1", 9.3), ("SPS30_P2", 4.8)]);
        let entity = AirQualityEntity::from_snapshot(
            state.snapshot.as_ref().unwrap(),
            &identity(),
        )
        .unwrap();

        assert_eq!(entity.particulate_matter_10(&state), Some(9.0));
        assert_eq!(entity.particulate_matter_2_5(&state), Some(5.0));
    }

    #[test]
    fn composite_absent_without_particulate_sensors() {
        let snapshot = snapshot(&[("BME280_temperature", 21.4)]);
        assert!(AirQualityEntity::from_snapshot(&snapshot, &identity()).is_none());
    }

    #[test]
    fn composite_unavailable_after_failed_poll() {
        let mut state = state(&[("SDS_P1", 12.0)]);
        let entity = AirQualityEntity::from_snapshot(
            state.snapshot.as_ref().unwrap(),
            &identity(),
        )
        .unwrap();

        assert!(entity.available(&state));
        state.last_update_success = false;
        assert!(!entity.available(&state));
    }
}
