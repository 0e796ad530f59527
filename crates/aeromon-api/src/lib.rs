// aeromon-api: Async Rust client for the Nettigo Air Monitor's local HTTP API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DeviceClient;
pub use error::Error;
pub use types::{DataResponse, SensorDataValue};
