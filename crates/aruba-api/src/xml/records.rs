// Typed-record builders
//
// Each builder maps flat entries through a required-field extractor.
// Entries missing a required field are dropped, never fatal: a long
// heterogeneous list from the switch should still yield the usable rows.

use tracing::trace;

use super::{Document, Entry, parse_document};
use crate::error::Error;
use crate::models::{
    ActionStatus, LogEntry, MacTableEntry, PoePortInfo, PortInfo, SystemInfo, VlanInfo,
};

fn build<T>(
    xml: &[u8],
    kind: &str,
    extract: impl Fn(&Entry) -> Option<T>,
) -> Result<Vec<T>, Error> {
    let Document { entries, .. } = parse_document(xml)?;
    let total = entries.len();
    let records: Vec<T> = entries.iter().filter_map(extract).collect();
    if records.len() < total {
        trace!(
            kind,
            dropped = total - records.len(),
            "dropped entries missing required fields"
        );
    }
    Ok(records)
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

// ── Extractors ──────────────────────────────────────────────────────

fn mac_table_entry(entry: &Entry) -> Option<MacTableEntry> {
    Some(MacTableEntry {
        vlan_id: entry.parse("VLANID")?,
        mac_address: owned(entry.get("MACAddress"))?,
        interface_type: entry.parse("interfaceType")?,
        interface_name: owned(entry.get("interfaceName"))?,
        address_type: entry.parse("addressType")?,
    })
}

fn port_info(entry: &Entry) -> Option<PortInfo> {
    Some(PortInfo {
        interface_name: owned(entry.get("interfaceName"))?,
        admin_state: entry.parse("adminState")?,
        operational_status: owned(entry.get("operationalStatus")),
        speed: owned(entry.get("speed")),
        duplex: owned(entry.get("duplex")),
    })
}

fn vlan_info(entry: &Entry) -> Option<VlanInfo> {
    Some(VlanInfo {
        vlan_id: entry.parse("VLANID")?,
        vlan_name: entry.get("vlanName").unwrap_or_default().to_owned(),
        status: owned(entry.get("status")),
    })
}

fn log_entry(entry: &Entry) -> Option<LogEntry> {
    Some(LogEntry {
        timestamp: owned(entry.first_of(&["timestamp", "logTime"]))?,
        severity: entry
            .first_of(&["severity", "logLevel"])
            .unwrap_or("INFO")
            .to_owned(),
        message: owned(entry.first_of(&["message", "logText"]))?,
    })
}

fn poe_port_info(entry: &Entry) -> Option<PoePortInfo> {
    Some(PoePortInfo {
        interface_name: owned(entry.get("interfaceName"))?,
        poe_enabled: entry.first_of(&["poeEnabled", "adminEnabled"]) == Some("1"),
        power_status: owned(entry.first_of(&["powerStatus", "detectionStatus"])),
        power_usage: entry.parse("powerUsage"),
    })
}

fn text_or_empty(entry: &Entry, keys: &[&str]) -> String {
    entry.first_of(keys).unwrap_or_default().to_owned()
}

fn system_info_entry(entry: &Entry) -> SystemInfo {
    SystemInfo {
        device_name: text_or_empty(entry, &["deviceName"]),
        model: text_or_empty(entry, &["model", "modelName"]),
        serial_number: text_or_empty(entry, &["serialNumber"]),
        firmware_version: text_or_empty(entry, &["firmwareVersion", "swVersion"]),
        mac_address: text_or_empty(entry, &["macAddress", "systemMACAddress"]),
    }
}

// ── Public builders ─────────────────────────────────────────────────

/// `{ForwardingTable}` -> MAC table rows.
pub fn mac_table(xml: &[u8]) -> Result<Vec<MacTableEntry>, Error> {
    build(xml, "mac-table", mac_table_entry)
}

/// `{Standard802_3List}` -> port states.
pub fn ports(xml: &[u8]) -> Result<Vec<PortInfo>, Error> {
    build(xml, "ports", port_info)
}

/// `{VLANList}` -> VLANs.
pub fn vlans(xml: &[u8]) -> Result<Vec<VlanInfo>, Error> {
    build(xml, "vlans", vlan_info)
}

/// `{MemoryLogTable}` -> log lines.
pub fn logs(xml: &[u8]) -> Result<Vec<LogEntry>, Error> {
    build(xml, "logs", log_entry)
}

/// `{PoEPSEInterfaceList}` -> PoE port states.
pub fn poe_ports(xml: &[u8]) -> Result<Vec<PoePortInfo>, Error> {
    build(xml, "poe", poe_port_info)
}

/// `{Units}` -> unit identity, taken from the first entry only.
pub fn system_info(xml: &[u8]) -> Result<Option<SystemInfo>, Error> {
    let doc = parse_document(xml)?;
    Ok(doc.entries.first().map(system_info_entry))
}

/// Status of a configuration POST.
///
/// Prefers the `<ActionStatus>` block; falls back to reading the status
/// fields from the first `<Entry>`.
pub fn action_status(xml: &[u8]) -> Result<ActionStatus, Error> {
    let Document {
        entries,
        action_status,
    } = parse_document(xml)?;
    if let Some(status) = action_status {
        return Ok(status);
    }
    entries
        .into_iter()
        .next()
        .map(Entry::into_action_status)
        .ok_or_else(|| Error::Parse {
            details: "No ActionStatus found in response".into(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn wrap(section: &str, body: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
            <ResponseData><DeviceConfiguration>
            <{section} type="section">{body}</{section}>
            </DeviceConfiguration></ResponseData>"#
        )
        .into_bytes()
    }

    #[test]
    fn forwarding_table_rows() {
        let xml = wrap(
            "ForwardingTable",
            "<Entry><VLANID>1</VLANID><MACAddress>00:11:22:33:44:55</MACAddress>\
             <interfaceType>1</interfaceType><interfaceName>5</interfaceName>\
             <addressType>3</addressType></Entry>\
             <Entry><VLANID>10</VLANID><MACAddress>aa:bb:cc:dd:ee:ff</MACAddress>\
             <interfaceType>1</interfaceType><interfaceName>8</interfaceName>\
             <addressType>1</addressType></Entry>",
        );
        let rows = mac_table(&xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vlan_id, 1);
        assert_eq!(rows[0].mac_address, "00:11:22:33:44:55");
        assert_eq!(rows[0].interface_name, "5");
        assert!(rows[0].is_dynamic());
        assert_eq!(rows[1].vlan_id, 10);
        assert!(!rows[1].is_dynamic());
    }

    #[test]
    fn forwarding_table_drops_incomplete_entries() {
        let xml = wrap(
            "ForwardingTable",
            "<Entry><VLANID>1</VLANID><MACAddress>00:11:22:33:44:55</MACAddress></Entry>\
             <Entry><VLANID>abc</VLANID><MACAddress>00:11:22:33:44:66</MACAddress>\
             <interfaceType>1</interfaceType><interfaceName>2</interfaceName>\
             <addressType>3</addressType></Entry>\
             <Entry><VLANID>1</VLANID><MACAddress>00:11:22:33:44:77</MACAddress>\
             <interfaceType>1</interfaceType><interfaceName>3</interfaceName>\
             <addressType>3</addressType></Entry>",
        );
        let rows = mac_table(&xml).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interface_name, "3");
    }

    #[test]
    fn empty_forwarding_table() {
        let xml = wrap("ForwardingTable", "");
        assert!(mac_table(&xml).unwrap().is_empty());
    }

    #[test]
    fn port_rows_with_optional_fields() {
        let xml = wrap(
            "Standard802_3List",
            "<Entry><interfaceName>1</interfaceName><adminState>1</adminState>\
             <operationalStatus>up</operationalStatus><speed>1000</speed>\
             <duplex>full</duplex></Entry>\
             <Entry><interfaceName>2</interfaceName><adminState>2</adminState></Entry>\
             <Entry><interfaceName>3</interfaceName></Entry>",
        );
        let rows = ports(&xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_enabled());
        assert_eq!(rows[0].operational_status.as_deref(), Some("up"));
        assert_eq!(rows[0].speed.as_deref(), Some("1000"));
        assert!(!rows[1].is_enabled());
        assert_eq!(rows[1].duplex, None);
    }

    #[test]
    fn vlan_rows_default_name() {
        let xml = wrap(
            "VLANList",
            "<Entry><VLANID>1</VLANID><vlanName>default</vlanName><status>active</status></Entry>\
             <Entry><VLANID>20</VLANID></Entry>\
             <Entry><vlanName>orphan</vlanName></Entry>",
        );
        let rows = vlans(&xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].vlan_name, "default");
        assert_eq!(rows[0].status.as_deref(), Some("active"));
        assert_eq!(rows[1].vlan_id, 20);
        assert_eq!(rows[1].vlan_name, "");
    }

    #[test]
    fn log_rows_accept_alternate_tags() {
        let xml = wrap(
            "MemoryLogTable",
            "<Entry><timestamp>2024-01-01 10:00:00</timestamp><severity>WARN</severity>\
             <message>link down</message></Entry>\
             <Entry><logTime>2024-01-01 10:01:00</logTime><logText>link up</logText></Entry>\
             <Entry><logTime>2024-01-01 10:02:00</logTime></Entry>",
        );
        let rows = logs(&xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].severity, "WARN");
        assert_eq!(rows[1].timestamp, "2024-01-01 10:01:00");
        assert_eq!(rows[1].message, "link up");
        assert_eq!(rows[1].severity, "INFO");
    }

    #[test]
    fn poe_rows() {
        let xml = wrap(
            "PoEPSEInterfaceList",
            "<Entry><interfaceName>1</interfaceName><adminEnabled>1</adminEnabled>\
             <detectionStatus>deliveringPower</detectionStatus><powerUsage>3.5</powerUsage></Entry>\
             <Entry><interfaceName>2</interfaceName><poeEnabled>2</poeEnabled>\
             <powerUsage>n/a</powerUsage></Entry>",
        );
        let rows = poe_ports(&xml).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].poe_enabled);
        assert_eq!(rows[0].power_status.as_deref(), Some("deliveringPower"));
        assert_eq!(rows[0].power_usage, Some(3.5));
        assert!(!rows[1].poe_enabled);
        assert_eq!(rows[1].power_usage, None);
    }

    #[test]
    fn system_info_from_first_entry_with_alternates() {
        let xml = wrap(
            "Units",
            "<Entry><deviceName>core-sw</deviceName><modelName>JL812A</modelName>\
             <serialNumber>SG123</serialNumber><swVersion>AW.1.0.5</swVersion>\
             <systemMACAddress>aa:bb:cc:00:11:22</systemMACAddress></Entry>\
             <Entry><deviceName>second</deviceName></Entry>",
        );
        let info = system_info(&xml).unwrap().unwrap();
        assert_eq!(info.device_name, "core-sw");
        assert_eq!(info.model, "JL812A");
        assert_eq!(info.firmware_version, "AW.1.0.5");
        assert_eq!(info.mac_address, "aa:bb:cc:00:11:22");
    }

    #[test]
    fn system_info_absent() {
        assert_eq!(system_info(&wrap("Units", "")).unwrap(), None);
    }

    #[test]
    fn action_status_failure_keeps_string() {
        let xml = b"<ResponseData><ActionStatus><statusCode>3</statusCode>\
                    <statusString>Configuration failed</statusString>\
                    <deviceStatusCode>1</deviceStatusCode></ActionStatus></ResponseData>";
        let status = action_status(xml).unwrap();
        assert!(!status.is_success());
        assert_eq!(status.status_code, 3);
        assert_eq!(status.status_string, "Configuration failed");
        assert_eq!(status.device_status_code, 1);
    }

    #[test]
    fn action_status_falls_back_to_first_entry() {
        let xml = b"<R><Entry><statusCode>0</statusCode><statusString>OK</statusString></Entry></R>";
        let status = action_status(xml).unwrap();
        assert!(status.is_success());
        assert_eq!(status.status_string, "OK");
    }

    #[test]
    fn action_status_missing_is_error() {
        let err = action_status(b"<R><Other>1</Other></R>").unwrap_err();
        match err {
            Error::Parse { details } => assert!(details.contains("No ActionStatus")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }
}
