//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aeromon_core::CoreError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const UNSUPPORTED: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const NOT_READY: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Invalid host: {host}")]
    #[diagnostic(
        code(aeromon::invalid_host),
        help(
            "The host must be an IP address or a plain hostname (no scheme, no port).\n\
             Examples: 192.168.1.5, nam-sensor.local"
        )
    )]
    InvalidHost { host: String },

    #[error("No device host configured")]
    #[diagnostic(
        code(aeromon::no_host),
        help(
            "Pass --host, set AEROMON_HOST, or add `host = \"...\"` to {path}"
        )
    )]
    NoHost { path: String },

    #[error("Could not connect to the device: {reason}")]
    #[diagnostic(
        code(aeromon::cannot_connect),
        help(
            "Check that the device is powered and on your network.\n\
             Try opening http://<host>/data.json in a browser."
        )
    )]
    CannotConnect { reason: String },

    #[error("Device is unsupported: it does not expose its MAC address")]
    #[diagnostic(
        code(aeromon::unsupported),
        help(
            "The firmware's status page is missing or disabled.\n\
             Pass --unique-id to identify the device yourself."
        )
    )]
    Unsupported,

    #[error("Device at {host} is not ready yet")]
    #[diagnostic(
        code(aeromon::not_ready),
        help("The device is likely still booting or measuring. Try again in a minute.")
    )]
    NotReady { host: String },

    #[error("Poll failed: {reason}")]
    #[diagnostic(code(aeromon::poll_failed))]
    PollFailed { reason: String },

    #[error("Configuration error: {reason}")]
    #[diagnostic(code(aeromon::config))]
    Config { reason: String },

    #[error("{0}")]
    #[diagnostic(code(aeromon::unknown))]
    Unknown(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidHost { .. } | Self::NoHost { .. } | Self::Config { .. } => {
                exit_code::USAGE
            }
            Self::Unsupported => exit_code::UNSUPPORTED,
            Self::CannotConnect { .. } | Self::PollFailed { .. } => exit_code::CONNECTION,
            Self::NotReady { .. } => exit_code::NOT_READY,
            Self::Unknown(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidHost { host } => Self::InvalidHost { host },
            CoreError::CannotConnect { reason } => Self::CannotConnect { reason },
            CoreError::DeviceUnsupported => Self::Unsupported,
            CoreError::NotReady { host } => Self::NotReady { host },
            CoreError::PollFailed { reason } => Self::PollFailed { reason },
            CoreError::Unknown(message) => Self::Unknown(message),
        }
    }
}
