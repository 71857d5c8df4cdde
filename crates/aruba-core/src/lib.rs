//! Port-management logic between `aruba-api` and the CLI.
//!
//! - **[`Controller`]**: one authenticated session plus local state. Its
//!   [`ban`](Controller::ban), [`disable`](Controller::disable) and
//!   [`enable`](Controller::enable) keep the activity log in step with the
//!   switch.
//!
//! - **[`PortActivityLog`]**: JSON file remembering which MACs were on a
//!   port when it went down, so a banned device can be found again after
//!   it drops out of the live MAC table.
//!
//! - **[`planner`]**: pure reconciliation of a MAC's live port against its
//!   last recorded one.
//!
//! - **[`MacAliases`]**: friendly names for MAC addresses.

pub mod aliases;
pub mod config;
pub mod controller;
pub mod error;
pub mod planner;
pub mod port_log;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aliases::{AliasError, MacAliases};
pub use config::ControllerConfig;
pub use controller::{
    BanOutcome, Controller, DisableOutcome, EnableOutcome, ResolvedMac, Target,
};
pub use error::CoreError;
pub use planner::{BanAction, plan};
pub use port_log::{PortActivityLog, PortLogError};

// Device types, re-exported so consumers need only this crate.
pub use aruba_api::{
    Error as ApiError, LogEntry, MacAddress, MacTableEntry, PoePortInfo, PortInfo, SystemInfo,
    VlanInfo,
};
