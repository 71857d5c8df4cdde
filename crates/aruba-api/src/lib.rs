// aruba-api: Async Rust client for the Aruba Instant On 1830 web-management interface

pub mod client;
pub mod error;
pub mod mac;
pub mod models;
pub mod session;
pub mod transport;
pub mod xml;

pub use client::DeviceClient;
pub use error::Error;
pub use mac::{MacAddress, is_mac_address};
pub use models::{
    ActionStatus, DisabledPort, LogEntry, MacTableEntry, PoePortInfo, PortInfo, SystemInfo,
    VlanInfo,
};
pub use session::{LoginRequest, Session};
pub use transport::TransportConfig;
