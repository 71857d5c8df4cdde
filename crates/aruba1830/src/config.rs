//! CLI configuration: thin wrapper around `aruba_config` shared types.
//!
//! Adds flag-aware resolution on top of the profile (--host, --password,
//! --port-mac-file, etc.) and the interactive password prompt.

use std::io::IsTerminal;
use std::time::Duration;

use secrecy::SecretString;

use aruba_config::{Config, ConfigError, Profile};
use aruba_core::ControllerConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
///
/// CLI flags (and their env vars) take priority over profile values.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = aruba_config::load_config()?;
    let profile_name = cfg.active_profile_name(global.profile.as_deref());
    let profile = cfg.profile(&profile_name);

    if global.profile.is_some() && profile.is_none() {
        return Err(CliError::Validation {
            field: "profile".into(),
            reason: format!(
                "no profile named '{profile_name}' in {}",
                aruba_config::config_path().display()
            ),
        });
    }

    resolve(global, &cfg, profile, &profile_name)
}

fn resolve(
    global: &GlobalOpts,
    cfg: &Config,
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<ControllerConfig, CliError> {
    // 1. Host and username (flag > env > profile)
    let host = global
        .host
        .clone()
        .or_else(|| profile.and_then(|p| p.host.clone()))
        .ok_or_else(|| CliError::MissingCredentials {
            what: "switch host".into(),
        })?;
    let username = global
        .user
        .clone()
        .or_else(|| profile.and_then(|p| p.username.clone()))
        .ok_or_else(|| CliError::MissingCredentials {
            what: "username".into(),
        })?;

    // 2. Session reuse
    let session_token = global
        .session_token
        .clone()
        .or_else(|| profile.and_then(|p| p.session_token.clone()));
    let session_cookie = global
        .session_cookie
        .clone()
        .or_else(|| profile.and_then(|p| p.session_cookie.clone()));

    // 3. Password; not needed when the whole session is supplied
    let password = if session_token.is_some() && session_cookie.is_some() {
        SecretString::from(String::new())
    } else {
        resolve_password(global, profile, profile_name, &username, &host)?
    };

    // 4. Timeout
    let timeout = Duration::from_secs(global.timeout.unwrap_or_else(|| cfg.timeout_for(profile)));

    // 5. Local files
    let port_log_path =
        aruba_config::port_log_path(global.port_mac_file.as_deref(), profile, &host);
    let alias_path = aruba_config::alias_path(global.mac_alias_file.as_deref(), profile);

    Ok(ControllerConfig {
        host,
        username,
        password,
        session_token,
        session_cookie,
        timeout,
        port_log_path,
        alias_path,
    })
}

/// Flag first, then the shared chain, then an interactive prompt.
fn resolve_password(
    global: &GlobalOpts,
    profile: Option<&Profile>,
    profile_name: &str,
    username: &str,
    host: &str,
) -> Result<SecretString, CliError> {
    if let Some(ref pw) = global.password {
        return Ok(SecretString::from(pw.clone()));
    }
    match aruba_config::resolve_password(profile, profile_name) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            let pw = rpassword::prompt_password(format!("Password for {username}@{host}: "))?;
            Ok(SecretString::from(pw))
        }
        Err(ConfigError::NoCredentials { .. }) => Err(CliError::MissingCredentials {
            what: "password".into(),
        }),
        Err(e) => Err(e.into()),
    }
}
