// ── Core error types ──
//
// User-facing errors from aeromon-core. Configuration-time and runtime
// failures are kept distinct: setup errors tell the caller whether to
// retry (`NotReady`) or give up (`DeviceUnsupported`), while `PollFailed`
// only marks data stale and is retried on the next interval.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration-time errors ────────────────────────────────────
    /// The host string failed validation. Raised before any I/O.
    #[error("Invalid host: {host}")]
    InvalidHost { host: String },

    /// The device could not be reached during configuration.
    #[error("Cannot connect to device: {reason}")]
    CannotConnect { reason: String },

    /// The device responded but cannot provide its MAC address.
    /// Setup is aborted, not retried.
    #[error("Device is unsupported: cannot read its MAC address")]
    DeviceUnsupported,

    /// The first poll after setup failed. The caller should retry
    /// setup later -- the device is likely still booting.
    #[error("Device at {host} is not ready yet")]
    NotReady { host: String },

    // ── Runtime errors ───────────────────────────────────────────────
    /// A scheduled poll failed. Data is stale until the next interval.
    #[error("Poll failed: {reason}")]
    PollFailed { reason: String },

    // ── Anything else ────────────────────────────────────────────────
    /// Unanticipated failure during configuration.
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

// ── Conversion from api-layer errors ─────────────────────────────────
//
// This mapping applies at configuration time. Poll-cycle failures are
// wrapped into `PollFailed` explicitly by the coordinator instead.

impl From<aeromon_api::Error> for CoreError {
    fn from(err: aeromon_api::Error) -> Self {
        match err {
            aeromon_api::Error::CannotGetMac => CoreError::DeviceUnsupported,
            aeromon_api::Error::Transport(ref e) => CoreError::CannotConnect {
                reason: e.to_string(),
            },
            aeromon_api::Error::Http { status } => CoreError::CannotConnect {
                reason: format!("device returned HTTP {status}"),
            },
            aeromon_api::Error::Deserialization { message, .. } => CoreError::CannotConnect {
                reason: format!("unreadable response: {message}"),
            },
            aeromon_api::Error::InvalidUrl(e) => CoreError::Unknown(format!("invalid URL: {e}")),
        }
    }
}
