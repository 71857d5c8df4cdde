// Shared transport configuration for building reqwest::Client instances.
//
// The session bootstrap and the device client share timeouts and the user
// agent through this module, avoiding duplicated builder logic.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
///
/// The switch only speaks plain HTTP, so there is no TLS configuration.
/// `request_timeout` bounds connection setup; `resource_timeout` bounds the
/// whole exchange including the body, so a stalled read fails cleanly.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub request_timeout: Duration,
    pub resource_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            resource_timeout: Duration::from_secs(60),
        }
    }
}

impl TransportConfig {
    /// Config with the given request timeout and a resource timeout of twice that.
    pub fn with_timeout(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            resource_timeout: request_timeout.saturating_mul(2),
        }
    }

    /// Build a `reqwest::Client` from this config.
    ///
    /// Redirects are followed (the login bootstrap relies on the final URL)
    /// and no cookie store is attached: the session cookie is sent
    /// explicitly on every request.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .connect_timeout(self.request_timeout)
            .timeout(self.resource_timeout)
            .user_agent(concat!("aruba1830/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)
    }
}
