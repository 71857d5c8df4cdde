// ── Core error types ──
//
// Device errors pass through unchanged so callers can still tell an auth
// rejection from a timeout. Core adds the failures of its own layer: the
// activity log, the alias file, and identifiers that resolve to nothing.

use thiserror::Error;

use crate::aliases::AliasError;
use crate::port_log::PortLogError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Device errors ────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] aruba_api::Error),

    // ── Local state ──────────────────────────────────────────────────
    #[error(transparent)]
    PortLog(#[from] PortLogError),

    #[error(transparent)]
    Alias(#[from] AliasError),

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    /// Neither the live MAC table nor the activity log knows the address.
    #[error("MAC address {mac} not found in MAC table or port log")]
    MacNotFound { mac: String },
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::MacNotFound { .. } => true,
            Self::Api(e) => e.is_not_found(),
            _ => false,
        }
    }
}
