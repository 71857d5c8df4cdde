// ── Runtime connection configuration ──
//
// Everything `Controller::connect` needs, already resolved. The CLI builds
// this from flags, profile and environment; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Configuration for one session against one switch.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Switch address, `host` or `host:port`. Always plain HTTP.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Reuse an existing session token instead of scraping one.
    pub session_token: Option<String>,
    /// Reuse an existing session cookie instead of logging in.
    pub session_cookie: Option<String>,
    /// Connect timeout; the whole exchange may take twice this.
    pub timeout: Duration,
    /// Port activity log file.
    pub port_log_path: PathBuf,
    /// MAC alias file, if one is configured or present.
    pub alias_path: Option<PathBuf>,
}
