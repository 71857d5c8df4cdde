// ── Typed device records ──
//
// Each record is built from one flat XML entry by the builders in
// `crate::xml`. Field names follow Rust conventions; the XML tag each one
// comes from is noted where it isn't obvious.

use serde::Serialize;

/// `addressType` value the switch uses for dynamically learned addresses.
const ADDRESS_TYPE_DYNAMIC: u32 = 3;

/// `adminState` value for an administratively enabled port.
pub const ADMIN_STATE_ENABLED: u32 = 1;

/// `adminState` value for an administratively disabled port.
pub const ADMIN_STATE_DISABLED: u32 = 2;

/// One row of the forwarding database (`{ForwardingTable}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacTableEntry {
    /// `VLANID`
    pub vlan_id: u16,
    /// `MACAddress`, as reported by the switch.
    pub mac_address: String,
    pub interface_type: u32,
    /// `interfaceName` -- the port number on this model.
    pub interface_name: String,
    pub address_type: u32,
}

impl MacTableEntry {
    pub fn is_dynamic(&self) -> bool {
        self.address_type == ADDRESS_TYPE_DYNAMIC
    }

    pub fn port(&self) -> &str {
        &self.interface_name
    }
}

/// Administrative and link state of one port (`{Standard802_3List}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub interface_name: String,
    pub admin_state: u32,
    pub operational_status: Option<String>,
    pub speed: Option<String>,
    pub duplex: Option<String>,
}

impl PortInfo {
    pub fn is_enabled(&self) -> bool {
        self.admin_state == ADMIN_STATE_ENABLED
    }

    pub fn port(&self) -> &str {
        &self.interface_name
    }
}

/// A configured VLAN (`{VLANList}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanInfo {
    pub vlan_id: u16,
    pub vlan_name: String,
    pub status: Option<String>,
}

/// Unit identity (`{Units}`). Missing fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    pub device_name: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    pub mac_address: String,
}

/// One line of the in-memory system log (`{MemoryLogTable}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub severity: String,
    pub message: String,
}

/// PoE state of one port (`{PoEPSEInterfaceList}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoePortInfo {
    pub interface_name: String,
    pub poe_enabled: bool,
    pub power_status: Option<String>,
    /// Watts, when reported.
    pub power_usage: Option<f64>,
}

/// The switch's verdict on a configuration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionStatus {
    pub status_code: i32,
    pub status_string: String,
    pub device_status_code: i32,
}

impl ActionStatus {
    pub fn is_success(&self) -> bool {
        self.status_code == 0
    }
}

/// Result of disabling the port a MAC was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisabledPort {
    pub port: String,
    /// Every entry that was on the port when it went down.
    pub macs: Vec<MacTableEntry>,
}
