// ── Controller abstraction ──
//
// One authenticated session plus the local state that outlives it (the
// port activity log and the alias table). Port commands go through here so
// that every enable, disable and ban keeps the log in step with the switch.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use aruba_api::{
    DeviceClient, LogEntry, LoginRequest, MacAddress, MacTableEntry, PoePortInfo, PortInfo,
    Session, SystemInfo, TransportConfig, VlanInfo, is_mac_address,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aliases::MacAliases;
use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::planner::{BanAction, plan};
use crate::port_log::{PortActivityLog, PortLogError};

/// Identifier that selects every port.
const ALL: &str = "all";

// ── Identifiers ──────────────────────────────────────────────────

/// A user-supplied MAC or alias, after alias lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMac {
    /// The alias target, or the input itself when no alias matched.
    pub mac: String,
    /// The alias as typed, when it resolved to a different string.
    pub alias: Option<String>,
}

impl fmt::Display for ResolvedMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} (alias: {alias})", self.mac),
            None => f.write_str(&self.mac),
        }
    }
}

/// What a port command's argument refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    All,
    Mac(ResolvedMac),
    Port(String),
}

// ── Outcomes ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BanOutcome {
    /// Not on the switch any more; the log already has it on `port`.
    AlreadyBanned { mac: ResolvedMac, port: String },
    Banned {
        mac: ResolvedMac,
        port: String,
        /// Port re-enabled because the MAC moved away from it.
        reenabled: Option<String>,
        /// Every MAC recorded against the disabled port.
        macs: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DisableOutcome {
    All { ports: Vec<String> },
    Mac {
        mac: ResolvedMac,
        port: String,
        macs: Vec<String>,
    },
    Port { port: String, macs: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EnableOutcome {
    All { ports: Vec<String> },
    Mac {
        mac: ResolvedMac,
        port: String,
        /// Found through the activity log rather than the live table.
        cached: bool,
    },
    Port { port: String },
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Owns the device client, the session, and the local activity log.
/// Methods that touch the log take `&mut self`.
pub struct Controller {
    client: DeviceClient,
    session: Session,
    port_log: PortActivityLog,
    aliases: MacAliases,
}

impl Controller {
    /// Log in and load local state.
    ///
    /// A broken alias file is reported and replaced by the empty table;
    /// the activity log is only read when first needed.
    pub async fn connect(config: ControllerConfig) -> Result<Self, CoreError> {
        let client = DeviceClient::new(&TransportConfig::with_timeout(config.timeout))?;
        let session = client
            .login(&LoginRequest {
                host: config.host,
                username: config.username,
                password: config.password,
                token: config.session_token,
                cookie: config.session_cookie,
            })
            .await?;
        info!(host = session.host(), "connected");

        let aliases = match &config.alias_path {
            Some(path) => MacAliases::load(path).unwrap_or_else(|e| {
                warn!("{e}");
                MacAliases::empty()
            }),
            None => MacAliases::empty(),
        };

        Ok(Self::from_parts(
            client,
            session,
            PortActivityLog::new(config.port_log_path),
            aliases,
        ))
    }

    /// Assemble a controller from an existing session.
    pub fn from_parts(
        client: DeviceClient,
        session: Session,
        port_log: PortActivityLog,
        aliases: MacAliases,
    ) -> Self {
        Self {
            client,
            session,
            port_log,
            aliases,
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn mac_table(
        &self,
        vlan: Option<u16>,
        port: Option<&str>,
    ) -> Result<Vec<MacTableEntry>, CoreError> {
        let entries = if vlan.is_some() || port.is_some() {
            self.client
                .mac_table_filtered(&self.session, vlan, port)
                .await?
        } else {
            self.client.mac_table(&self.session).await?
        };
        Ok(entries)
    }

    pub async fn ports(&self) -> Result<Vec<PortInfo>, CoreError> {
        Ok(self.client.ports(&self.session).await?)
    }

    pub async fn system_info(&self) -> Result<Option<SystemInfo>, CoreError> {
        Ok(self.client.system_info(&self.session).await?)
    }

    pub async fn logs(&self) -> Result<Vec<LogEntry>, CoreError> {
        Ok(self.client.logs(&self.session).await?)
    }

    pub async fn vlans(&self) -> Result<Vec<VlanInfo>, CoreError> {
        Ok(self.client.vlans(&self.session).await?)
    }

    pub async fn poe_ports(&self) -> Result<Vec<PoePortInfo>, CoreError> {
        Ok(self.client.poe_ports(&self.session).await?)
    }

    /// Current contents of the activity log.
    pub fn port_log_snapshot(&mut self) -> Result<BTreeMap<String, Vec<String>>, CoreError> {
        Ok(self.port_log.snapshot()?)
    }

    // ── Identifiers ──────────────────────────────────────────────

    /// Look `input` up as an alias; fall back to the literal text.
    pub fn resolve_identifier(&self, input: &str) -> ResolvedMac {
        match self.aliases.resolve(input) {
            Some(mac) => ResolvedMac {
                mac: mac.as_str().to_owned(),
                alias: (!mac.as_str().eq_ignore_ascii_case(input)).then(|| input.to_owned()),
            },
            None => ResolvedMac {
                mac: input.to_owned(),
                alias: None,
            },
        }
    }

    /// Classify a port command argument: `all`, a MAC (or alias), or a port.
    pub fn target(&self, input: &str) -> Target {
        if input.eq_ignore_ascii_case(ALL) {
            return Target::All;
        }
        let resolved = self.resolve_identifier(input);
        if is_mac_address(&resolved.mac) {
            Target::Mac(resolved)
        } else {
            Target::Port(input.to_owned())
        }
    }

    // ── Port commands ────────────────────────────────────────────

    /// Ban a MAC by disabling the port it is on, following it if it moved.
    pub async fn ban(&mut self, input: &str, force: bool) -> Result<BanOutcome, CoreError> {
        let mac = self.resolve_identifier(input);
        if !is_mac_address(&mac.mac) {
            return Err(aruba_api::Error::InvalidMacAddress(input.to_owned()).into());
        }
        self.ensure_log_loaded();

        let saved_port = self.port_log.port_for_mac(&mac.mac).unwrap_or_else(|e| {
            warn!("Failed to read cached port for MAC {mac}: {e}");
            None
        });
        let live = self
            .client
            .find_mac(&self.session, &MacAddress::new(&mac.mac))
            .await?;

        let action = plan(saved_port.as_deref(), &live).ok_or_else(|| CoreError::MacNotFound {
            mac: mac.to_string(),
        })?;
        debug!(?action, "ban planned");

        match action {
            BanAction::AlreadyBanned { port } => Ok(BanOutcome::AlreadyBanned { mac, port }),
            BanAction::BanOn {
                port,
                previous_port,
            } => {
                if let Some(previous) = &previous_port {
                    self.client
                        .set_port_state(&self.session, previous, true)
                        .await?;
                    warn_log(self.port_log.remove_mac(&mac.mac, previous), previous);
                    info!(port = %previous, moved_to = %port, "re-enabled port after MAC moved");
                }

                let disabled = self
                    .client
                    .disable_port_by_mac(&self.session, &mac.mac, force)
                    .await?;
                if disabled.port != port {
                    warn!(
                        "MAC {mac} found on unexpected port {}; expected {port}",
                        disabled.port
                    );
                }
                let macs = mac_strings(&disabled.macs);
                warn_log(self.port_log.record(&disabled.port, &macs), &disabled.port);

                Ok(BanOutcome::Banned {
                    mac,
                    port: disabled.port,
                    reenabled: previous_port,
                    macs,
                })
            }
        }
    }

    /// Disable every enabled port, the port a MAC is on, or a port by number.
    pub async fn disable(
        &mut self,
        input: &str,
        force: bool,
    ) -> Result<DisableOutcome, CoreError> {
        if input.is_empty() {
            return Err(CoreError::MissingArgument(
                "Port number, MAC address, or 'all' required".into(),
            ));
        }
        self.ensure_log_loaded();

        match self.target(input) {
            Target::All => {
                let ports = self.client.ports(&self.session).await?;
                let table = self.client.mac_table(&self.session).await?;
                let mut by_port: HashMap<&str, Vec<String>> = HashMap::new();
                for entry in &table {
                    by_port
                        .entry(entry.port())
                        .or_default()
                        .push(entry.mac_address.clone());
                }

                let mut disabled = Vec::new();
                for port in ports.iter().filter(|p| p.is_enabled()) {
                    let name = port.port();
                    self.client
                        .set_port_state(&self.session, name, false)
                        .await?;
                    let macs = by_port.get(name).map(Vec::as_slice).unwrap_or_default();
                    warn_log(self.port_log.record(name, macs), name);
                    disabled.push(name.to_owned());
                }
                Ok(DisableOutcome::All { ports: disabled })
            }
            Target::Mac(mac) => {
                let result = self
                    .client
                    .disable_port_by_mac(&self.session, &mac.mac, force)
                    .await?;
                let macs = mac_strings(&result.macs);
                warn_log(self.port_log.record(&result.port, &macs), &result.port);
                Ok(DisableOutcome::Mac {
                    mac,
                    port: result.port,
                    macs,
                })
            }
            Target::Port(port) => {
                let entries = self
                    .client
                    .mac_table_filtered(&self.session, None, Some(&port))
                    .await?;
                self.client
                    .set_port_state(&self.session, &port, false)
                    .await?;
                let macs = mac_strings(&entries);
                warn_log(self.port_log.record(&port, &macs), &port);
                Ok(DisableOutcome::Port { port, macs })
            }
        }
    }

    /// Enable every disabled port, the port a MAC was on, or a port by number.
    ///
    /// A MAC is looked up in the live table first, then in the activity
    /// log (a banned device usually drops out of the live table).
    pub async fn enable(&mut self, input: &str) -> Result<EnableOutcome, CoreError> {
        if input.is_empty() {
            return Err(CoreError::MissingArgument(
                "Port number, MAC address, or 'all' required".into(),
            ));
        }
        self.ensure_log_loaded();

        match self.target(input) {
            Target::All => {
                let ports = self.client.ports(&self.session).await?;
                let mut enabled = Vec::new();
                for port in &ports {
                    let name = port.port();
                    if !port.is_enabled() {
                        self.client
                            .set_port_state(&self.session, name, true)
                            .await?;
                        enabled.push(name.to_owned());
                    }
                    warn_log(self.port_log.remove_port(name), name);
                }
                Ok(EnableOutcome::All { ports: enabled })
            }
            Target::Mac(mac) => {
                let live = self
                    .client
                    .find_mac(&self.session, &MacAddress::new(&mac.mac))
                    .await?;
                let (port, cached) = match live.first() {
                    Some(entry) => (entry.port().to_owned(), false),
                    None => {
                        let cached = self.port_log.port_for_mac(&mac.mac).unwrap_or_else(|e| {
                            warn!("Failed to read cached port for MAC {mac}: {e}");
                            None
                        });
                        let port = cached.ok_or_else(|| CoreError::MacNotFound {
                            mac: mac.to_string(),
                        })?;
                        (port, true)
                    }
                };
                self.client
                    .set_port_state(&self.session, &port, true)
                    .await?;
                warn_log(self.port_log.remove_port(&port), &port);
                Ok(EnableOutcome::Mac { mac, port, cached })
            }
            Target::Port(port) => {
                self.client
                    .set_port_state(&self.session, &port, true)
                    .await?;
                warn_log(self.port_log.remove_port(&port), &port);
                Ok(EnableOutcome::Port { port })
            }
        }
    }

    // ── PoE ──────────────────────────────────────────────────────

    pub async fn set_poe(&self, port: &str, enabled: bool) -> Result<(), CoreError> {
        Ok(self
            .client
            .set_poe_state(&self.session, port, enabled)
            .await?)
    }

    fn ensure_log_loaded(&mut self) {
        if let Err(e) = self.port_log.load() {
            warn!("{e}");
        }
    }
}

/// Activity log failures never fail a port operation that already happened.
fn warn_log(result: Result<(), PortLogError>, port: &str) {
    if let Err(e) = result {
        warn!("Failed to update port MAC log for port {port}: {e}");
    }
}

fn mac_strings(entries: &[MacTableEntry]) -> Vec<String> {
    entries.iter().map(|e| e.mac_address.clone()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn controller(aliases: &str) -> Controller {
        Controller::from_parts(
            DeviceClient::new(&TransportConfig::default()).unwrap(),
            Session::new("127.0.0.1", "tok", "cookie", "admin"),
            PortActivityLog::new("unused.ports"),
            MacAliases::parse(aliases),
        )
    }

    #[test]
    fn alias_resolution_and_display() {
        let ctl = controller("AA:BB:CC:11:22:33 printer\n");

        let resolved = ctl.resolve_identifier("Printer");
        assert_eq!(resolved.mac, "aa:bb:cc:11:22:33");
        assert_eq!(resolved.alias.as_deref(), Some("Printer"));
        assert_eq!(resolved.to_string(), "aa:bb:cc:11:22:33 (alias: Printer)");

        let literal = ctl.resolve_identifier("00:11:22:33:44:55");
        assert_eq!(literal.alias, None);
        assert_eq!(literal.to_string(), "00:11:22:33:44:55");
    }

    #[test]
    fn targets_are_classified() {
        let ctl = controller("00:11:22:33:44:55 camera\n");

        assert_eq!(ctl.target("ALL"), Target::All);
        assert!(matches!(ctl.target("camera"), Target::Mac(ref m) if m.mac == "00:11:22:33:44:55"));
        assert!(matches!(ctl.target("aa-bb-cc-dd-ee-ff"), Target::Mac(_)));
        assert_eq!(ctl.target("12"), Target::Port("12".into()));
    }
}
