//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aruba_config::ConfigError;
use aruba_core::{ApiError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the switch")]
    #[diagnostic(
        code(aruba::connection_failed),
        help(
            "Check that the switch is powered on and reachable over HTTP.\n\
             Host and port come from --host, ARUBA_HOST or the profile."
        )
    )]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the switch timed out")]
    #[diagnostic(
        code(aruba::timeout),
        help("Increase timeout with --timeout or check switch responsiveness.")
    )]
    Timeout {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(aruba::auth_failed),
        help(
            "Verify the username and password.\n\
             A stale --session-token/--session-cookie pair also ends up here; drop them to log in again."
        )
    )]
    AuthFailed { message: String },

    #[error("Missing {what}")]
    #[diagnostic(
        code(aruba::missing_credentials),
        help(
            "Pass --host, --user and --password, set ARUBA_HOST / ARUBA_USERNAME / ARUBA_PASSWORD,\n\
             or add a profile to the config file (see: aruba1830 config path)."
        )
    )]
    MissingCredentials { what: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(aruba::not_found),
        help("Run: aruba1830 {list_command} to see what the switch knows about")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{count} MAC addresses found on port {port}")]
    #[diagnostic(
        code(aruba::multiple_macs),
        help("Disabling the port cuts off every device on it. Use --force to disable anyway.")
    )]
    MultipleMacs { port: String, count: usize },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Switch error: {message}")]
    #[diagnostic(code(aruba::device))]
    Device { message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(aruba::local_state))]
    LocalState { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aruba::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(aruba::config),
        help("Check the config file (see: aruba1830 config path).")
    )]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(aruba::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(aruba::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(aruba::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::MissingCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::MultipleMacs { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::MissingCredentials {
                what: format!("password for profile '{profile}'"),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),

            CoreError::PortLog(e) => CliError::LocalState {
                message: e.to_string(),
            },

            CoreError::Alias(e) => CliError::LocalState {
                message: e.to_string(),
            },

            CoreError::MissingArgument(reason) => CliError::Validation {
                field: "target".into(),
                reason,
            },

            CoreError::MacNotFound { mac } => CliError::NotFound {
                resource_type: "MAC address".into(),
                identifier: mac,
                list_command: "mac-table".into(),
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(e) if e.is_timeout() => CliError::Timeout {
                source: Box::new(e),
            },

            ApiError::Transport(e) if e.is_connect() => CliError::ConnectionFailed {
                source: Box::new(e),
            },

            ApiError::Authentication { message } => CliError::AuthFailed { message },

            ApiError::InvalidUrl(url) => CliError::Validation {
                field: "host".into(),
                reason: format!("'{url}' is not a valid switch URL"),
            },

            ApiError::MacNotFound(mac) => CliError::NotFound {
                resource_type: "MAC address".into(),
                identifier: mac,
                list_command: "mac-table".into(),
            },

            ApiError::MultipleMacsOnPort { port, count } => CliError::MultipleMacs { port, count },

            ApiError::InvalidMacAddress(value) => CliError::Validation {
                field: "MAC address".into(),
                reason: format!("'{value}' is not six hex pairs separated by ':' or '-'"),
            },

            other => CliError::Device {
                message: other.to_string(),
            },
        }
    }
}
