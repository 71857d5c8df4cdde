// ── Ban planner ──
//
// Reconciles where a MAC is now (live MAC table) with where it was last
// banned (port activity log). Pure: no I/O.

use aruba_api::MacTableEntry;
use serde::Serialize;

/// What a ban request should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BanAction {
    /// The MAC is gone from the live table but the log has it on `port`.
    AlreadyBanned { port: String },
    /// Disable `port`. When the MAC moved since the last ban, re-enable
    /// `previous_port` first.
    BanOn {
        port: String,
        previous_port: Option<String>,
    },
}

/// Decide the ban action from the saved port and the live MAC-table rows.
///
/// Only the first live row is consulted. `None` means the MAC is unknown
/// to both the switch and the log.
pub fn plan(saved_port: Option<&str>, live: &[MacTableEntry]) -> Option<BanAction> {
    match (live.first(), saved_port) {
        (Some(entry), saved) => {
            let port = entry.port().to_owned();
            let previous_port = saved.filter(|s| *s != port).map(str::to_owned);
            Some(BanAction::BanOn {
                port,
                previous_port,
            })
        }
        (None, Some(saved)) => Some(BanAction::AlreadyBanned {
            port: saved.to_owned(),
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(port: &str) -> MacTableEntry {
        MacTableEntry {
            vlan_id: 1,
            mac_address: "00:11:22:33:44:55".into(),
            interface_type: 1,
            interface_name: port.into(),
            address_type: 3,
        }
    }

    #[test]
    fn unknown_everywhere() {
        assert_eq!(plan(None, &[]), None);
    }

    #[test]
    fn only_in_log_is_already_banned() {
        assert_eq!(
            plan(Some("4"), &[]),
            Some(BanAction::AlreadyBanned { port: "4".into() })
        );
    }

    #[test]
    fn live_without_history() {
        assert_eq!(
            plan(None, &[entry("3")]),
            Some(BanAction::BanOn {
                port: "3".into(),
                previous_port: None
            })
        );
    }

    #[test]
    fn live_on_same_port_as_saved() {
        assert_eq!(
            plan(Some("3"), &[entry("3")]),
            Some(BanAction::BanOn {
                port: "3".into(),
                previous_port: None
            })
        );
    }

    #[test]
    fn moved_since_last_ban() {
        assert_eq!(
            plan(Some("4"), &[entry("6")]),
            Some(BanAction::BanOn {
                port: "6".into(),
                previous_port: Some("4".into())
            })
        );
    }

    #[test]
    fn only_first_live_entry_counts() {
        assert_eq!(
            plan(None, &[entry("2"), entry("9")]),
            Some(BanAction::BanOn {
                port: "2".into(),
                previous_port: None
            })
        );
    }
}
