use thiserror::Error;

/// Top-level error type for the `aeromon-api` crate.
///
/// Covers every failure mode of the device's two endpoints: transport,
/// HTTP status, payload decoding, and MAC discovery. `aeromon-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL construction error (host produced an unparsable base URL).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Device API ──────────────────────────────────────────────────
    /// Device answered with a non-2xx status.
    #[error("Device returned HTTP {status}")]
    Http { status: u16 },

    /// JSON decoding failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The device's status page does not expose a MAC address.
    #[error("Cannot read MAC address from device")]
    CannotGetMac,
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }
}
