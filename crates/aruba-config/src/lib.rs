//! Shared configuration for the aruba1830 CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and the
//! on-disk locations of the port activity log and the MAC alias file. The
//! CLI layers its flag overrides on top of this.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Profile used when neither the flag nor the config file names one.
pub const DEFAULT_PROFILE: &str = "default";

/// Keyring service name; entries are stored as `{profile}/password`.
pub const KEYRING_SERVICE: &str = "aruba1830";

/// Environment variable consulted for the switch password.
pub const PASSWORD_ENV: &str = "ARUBA_PASSWORD";

/// Alias file picked up from the working directory when present.
pub const DEFAULT_ALIAS_FILE: &str = ".aruba1830-macaliases.txt";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named switch profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named switch profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Switch address, `host` or `host:port`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password (plaintext, prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Reuse a session token from an earlier login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,

    /// Reuse a session cookie from an earlier login or a browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,

    /// Port activity log location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_log: Option<PathBuf>,

    /// MAC alias file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_aliases: Option<PathBuf>,

    /// Override timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Profile name from the flag, else the configured default.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Timeout in seconds for `profile`, falling back to the global default.
    pub fn timeout_for(&self, profile: Option<&Profile>) -> u64 {
        profile
            .and_then(|p| p.timeout)
            .unwrap_or(self.defaults.timeout)
    }

    /// Copy with every plaintext secret masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for profile in copy.profiles.values_mut() {
            if profile.password.is_some() {
                profile.password = Some(REDACTED.into());
            }
            if profile.session_cookie.is_some() {
                profile.session_cookie = Some(REDACTED.into());
            }
        }
        copy
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aruba1830", "aruba1830").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aruba1830");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys come from `ARUBA_` variables split on `__`, e.g.
/// `ARUBA_PROFILES__LAB__HOST`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARUBA_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the switch password from the credential chain (no CLI flag or
/// prompt step): `password_env`, `ARUBA_PASSWORD`, keyring, plaintext.
pub fn resolve_password(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(env_name) = profile.and_then(|p| p.password_env.as_deref()) {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(secret) = keyring_password(profile_name) {
        return Ok(SecretString::from(secret));
    }

    // 4. Plaintext in config
    if let Some(pw) = profile.and_then(|p| p.password.clone()) {
        return Ok(SecretString::from(pw));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

fn keyring_password(profile_name: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")).ok()?;
    match entry.get_password() {
        Ok(pw) => Some(pw),
        Err(e) => {
            debug!(profile = profile_name, "no keyring password: {e}");
            None
        }
    }
}

// ── Local files ─────────────────────────────────────────────────────

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_for_filename(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Port activity log location: flag, else profile, else
/// `.aruba1830_{host}.ports` in the working directory.
pub fn port_log_path(flag: Option<&Path>, profile: Option<&Profile>, host: &str) -> PathBuf {
    non_empty(flag)
        .or_else(|| non_empty(profile.and_then(|p| p.port_log.as_deref())))
        .map_or_else(
            || PathBuf::from(format!(".aruba1830_{}.ports", sanitize_for_filename(host))),
            Path::to_path_buf,
        )
}

/// MAC alias file location: flag, else profile, else the default file if
/// it exists in the working directory.
pub fn alias_path(flag: Option<&Path>, profile: Option<&Profile>) -> Option<PathBuf> {
    non_empty(flag)
        .or_else(|| non_empty(profile.and_then(|p| p.mac_aliases.as_deref())))
        .map(Path::to_path_buf)
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_ALIAS_FILE);
            default.exists().then_some(default)
        })
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
