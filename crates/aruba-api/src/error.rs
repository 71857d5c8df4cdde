use thiserror::Error;

/// Top-level error type for the `aruba-api` crate.
///
/// Covers every failure mode of the switch's web interface: URL
/// construction, HTTP status, session scraping, XML parsing, and the
/// device-reported status of configuration writes. `aruba-core` wraps these
/// and the CLI maps them into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// A URL could not be built from the host/token/section (e.g. a host
    /// with spaces).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response that isn't an auth rejection.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── Authentication ──────────────────────────────────────────────
    /// Session establishment failed, or the switch rejected the session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Device ──────────────────────────────────────────────────────
    /// The switch answered a configuration request with a non-zero status.
    #[error("Configuration failed: {status}")]
    ConfigurationFailed { status: String },

    /// XML could not be tokenized, or a required block was absent.
    #[error("Failed to parse response: {details}")]
    Parse { details: String },

    /// The MAC address is not present in the live MAC table.
    #[error("MAC address {0} not found in MAC table")]
    MacNotFound(String),

    /// Disabling the port would evict other devices sharing it.
    #[error("Multiple MAC addresses ({count}) found on port {port}. Use --force to disable anyway.")]
    MultipleMacsOnPort { port: String, count: usize },

    /// Input is not a six-octet MAC address.
    #[error("Invalid MAC address format: {0}")]
    InvalidMacAddress(String),
}

impl Error {
    /// Returns `true` if the switch rejected or failed to issue a session.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if the request timed out at the transport layer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the switch could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MacNotFound(_) | Self::Http { status: 404, .. })
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::Parse {
            details: err.to_string(),
        }
    }
}
