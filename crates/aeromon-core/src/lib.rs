// aeromon-core: Domain layer between aeromon-api and consumers.
//
// Owns the polling coordinator, the field metadata table, and the
// entity adaptation that turns raw keyed readings into typed sensor
// records. Consumers (the CLI, or any embedding host) only see domain
// types -- wire shapes and HTTP details stay inside aeromon-api.

pub mod config;
pub mod convert;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod fields;
pub mod model;
pub mod setup;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_UPDATE_INTERVAL, DeviceConfig, validate_host};
pub use coordinator::{Coordinator, PollState};
pub use entity::{AirQualityEntity, SensorEntity, build_sensor_entities};
pub use error::CoreError;
pub use fields::{DeviceClass, FIELDS, FieldSpec, ValueFormat};
pub use model::{DeviceIdentity, MacAddress, Snapshot, Value};
pub use setup::{DeviceContext, DiscoveryInfo, setup, setup_with_client};
