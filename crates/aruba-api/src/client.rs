// Device HTTP client
//
// Every read is `GET {base}/wcd?{Section}`; every write is a POST to the
// same endpoint naming the sections it touches, with a
// `<DeviceConfiguration>` body. Responses are handed to `crate::xml`.
// The session is passed into each call rather than held here, so one
// client can serve the login handshake too.

use quick_xml::escape::escape;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::mac::{MacAddress, is_mac_address};
use crate::models::{
    ADMIN_STATE_DISABLED, ADMIN_STATE_ENABLED, DisabledPort, LogEntry, MacTableEntry,
    PoePortInfo, PortInfo, SystemInfo, VlanInfo,
};
use crate::session::Session;
use crate::transport::TransportConfig;
use crate::xml;

/// PoE `adminEnabled` values.
const POE_ENABLED: u32 = 1;
const POE_DISABLED: u32 = 2;

/// Raw HTTP client for the switch's `wcd` endpoint.
pub struct DeviceClient {
    http: reqwest::Client,
}

impl DeviceClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// The underlying HTTP client (for the login handshake).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn wcd_url(session: &Session, sections: &str) -> Result<Url, Error> {
        parse_url(format!("{}/wcd?{sections}", session.base_url()))
    }

    /// GET one or more sections and return the raw body.
    async fn get(&self, session: &Session, sections: &str) -> Result<Vec<u8>, Error> {
        let url = Self::wcd_url(session, sections)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::COOKIE, session.cookie_header())
            .header(reqwest::header::ACCEPT, "*/*")
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp.status())?;
        let body = resp.bytes().await.map_err(Error::Transport)?;
        Ok(body.to_vec())
    }

    /// POST a configuration document and require a successful ActionStatus.
    async fn post(&self, session: &Session, sections: &str, body: String) -> Result<(), Error> {
        let url = Self::wcd_url(session, sections)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .header(reqwest::header::COOKIE, session.cookie_header())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        check_status(resp.status())?;
        let body = resp.bytes().await.map_err(Error::Transport)?;
        let status = xml::action_status(&body)?;
        if !status.is_success() {
            return Err(Error::ConfigurationFailed {
                status: status.status_string,
            });
        }
        Ok(())
    }

    // ── MAC table ────────────────────────────────────────────────────

    pub async fn mac_table(&self, session: &Session) -> Result<Vec<MacTableEntry>, Error> {
        let body = self.get(session, "{ForwardingTable}").await?;
        xml::mac_table(&body)
    }

    /// MAC table narrowed to a VLAN and/or a port.
    pub async fn mac_table_filtered(
        &self,
        session: &Session,
        vlan: Option<u16>,
        port: Option<&str>,
    ) -> Result<Vec<MacTableEntry>, Error> {
        let entries = self.mac_table(session).await?;
        Ok(filter_entries(entries, vlan, port))
    }

    /// Live MAC-table rows for one address, compared in canonical form.
    pub async fn find_mac(
        &self,
        session: &Session,
        mac: &MacAddress,
    ) -> Result<Vec<MacTableEntry>, Error> {
        let entries = self.mac_table(session).await?;
        Ok(entries
            .into_iter()
            .filter(|e| MacAddress::new(&e.mac_address) == *mac)
            .collect())
    }

    // ── Ports ────────────────────────────────────────────────────────

    pub async fn ports(&self, session: &Session) -> Result<Vec<PortInfo>, Error> {
        let body = self.get(session, "{Standard802_3List}").await?;
        xml::ports(&body)
    }

    /// Administratively enable or disable a port.
    ///
    /// The same request re-asserts STP on the port and deletes any
    /// time-based schedule, so a scheduled rule can't flip it back.
    pub async fn set_port_state(
        &self,
        session: &Session,
        port: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        let admin_state = if enabled {
            ADMIN_STATE_ENABLED
        } else {
            ADMIN_STATE_DISABLED
        };
        let port = escape(port);
        let body = format!(
            r#"<?xml version='1.0' encoding='utf-8'?>
<DeviceConfiguration>
  <Standard802_3List action="set">
    <Entry>
      <adminState>{admin_state}</adminState>
      <interfaceName>{port}</interfaceName>
      <interfaceDescription></interfaceDescription>
      <autoNegotiationAdminEnabled>1</autoNegotiationAdminEnabled>
      <adminAdvertisementList>100000000000000000000000</adminAdvertisementList>
    </Entry>
  </Standard802_3List>
  <STP action="set">
    <InterfaceList>
      <InterfaceEntry>
        <interfaceName>{port}</interfaceName>
        <STPEnabled>1</STPEnabled>
        <timeRangeName></timeRangeName>
      </InterfaceEntry>
    </InterfaceList>
  </STP>
  <TimeBasedPortTable action="delete">
    <Entry>
      <interfaceName>{port}</interfaceName>
      <timeRangeName></timeRangeName>
    </Entry>
  </TimeBasedPortTable>
</DeviceConfiguration>"#
        );
        self.post(session, "{Standard802_3List}{STP}{TimeBasedPortTable}", body)
            .await
    }

    /// Disable the port a MAC address is currently learned on.
    ///
    /// Refuses with [`Error::MultipleMacsOnPort`] when other addresses
    /// share the port, unless `force` is set. Returns the port together
    /// with every MAC-table row that was on it.
    pub async fn disable_port_by_mac(
        &self,
        session: &Session,
        mac: &str,
        force: bool,
    ) -> Result<DisabledPort, Error> {
        if !is_mac_address(mac) {
            return Err(Error::InvalidMacAddress(mac.to_owned()));
        }
        let wanted = MacAddress::new(mac);

        let table = self.mac_table(session).await?;
        let port = table
            .iter()
            .find(|e| MacAddress::new(&e.mac_address) == wanted)
            .map(|e| e.interface_name.clone())
            .ok_or_else(|| Error::MacNotFound(mac.to_owned()))?;

        let macs = filter_entries(table, None, Some(&port));
        if macs.len() > 1 && !force {
            return Err(Error::MultipleMacsOnPort {
                port,
                count: macs.len(),
            });
        }

        self.set_port_state(session, &port, false).await?;
        Ok(DisabledPort { port, macs })
    }

    // ── System ───────────────────────────────────────────────────────

    pub async fn system_info(&self, session: &Session) -> Result<Option<SystemInfo>, Error> {
        let body = self.get(session, "{Units}").await?;
        xml::system_info(&body)
    }

    pub async fn logs(&self, session: &Session) -> Result<Vec<LogEntry>, Error> {
        let body = self.get(session, "{MemoryLogTable}").await?;
        xml::logs(&body)
    }

    // ── VLANs ────────────────────────────────────────────────────────

    pub async fn vlans(&self, session: &Session) -> Result<Vec<VlanInfo>, Error> {
        let body = self.get(session, "{VLANList}").await?;
        xml::vlans(&body)
    }

    // ── PoE ──────────────────────────────────────────────────────────

    pub async fn poe_ports(&self, session: &Session) -> Result<Vec<PoePortInfo>, Error> {
        let body = self.get(session, "{PoEPSEInterfaceList}").await?;
        xml::poe_ports(&body)
    }

    /// Turn power delivery on a port on or off.
    pub async fn set_poe_state(
        &self,
        session: &Session,
        port: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        let admin_enabled = if enabled { POE_ENABLED } else { POE_DISABLED };
        let port = escape(port);
        let body = format!(
            r#"<?xml version='1.0' encoding='utf-8'?>
<DeviceConfiguration>
  <PoEPSEInterfaceList action="set">
    <Entry>
      <interfaceName>{port}</interfaceName>
      <adminEnabled>{admin_enabled}</adminEnabled>
    </Entry>
  </PoEPSEInterfaceList>
</DeviceConfiguration>"#
        );
        self.post(session, "{PoEPSEInterfaceList}", body).await
    }
}

/// Parse a device URL, keeping the raw text for the error.
pub(crate) fn parse_url(raw: String) -> Result<Url, Error> {
    Url::parse(&raw).map_err(|e| {
        debug!("rejected URL: {e}");
        Error::InvalidUrl(raw)
    })
}

/// Map a response status onto the crate's error kinds.
fn check_status(status: reqwest::StatusCode) -> Result<(), Error> {
    let code = status.as_u16();
    match code {
        200..=299 => Ok(()),
        401 => Err(Error::Authentication {
            message: "Unauthorized".into(),
        }),
        403 => Err(Error::Authentication {
            message: "Forbidden".into(),
        }),
        404 => Err(Error::Http {
            status: 404,
            message: "Not Found".into(),
        }),
        500..=599 => Err(Error::Http {
            status: code,
            message: "Server Error".into(),
        }),
        _ => Err(Error::Http {
            status: code,
            message: "HTTP Error".into(),
        }),
    }
}

fn filter_entries(
    entries: Vec<MacTableEntry>,
    vlan: Option<u16>,
    port: Option<&str>,
) -> Vec<MacTableEntry> {
    entries
        .into_iter()
        .filter(|e| vlan.is_none_or(|v| e.vlan_id == v))
        .filter(|e| port.is_none_or(|p| e.interface_name == p))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(vlan: u16, mac: &str, port: &str) -> MacTableEntry {
        MacTableEntry {
            vlan_id: vlan,
            mac_address: mac.into(),
            interface_type: 1,
            interface_name: port.into(),
            address_type: 3,
        }
    }

    #[test]
    fn status_mapping() {
        use reqwest::StatusCode;

        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());

        let err = check_status(StatusCode::UNAUTHORIZED).unwrap_err();
        assert!(matches!(err, Error::Authentication { ref message } if message == "Unauthorized"));
        let err = check_status(StatusCode::FORBIDDEN).unwrap_err();
        assert!(matches!(err, Error::Authentication { ref message } if message == "Forbidden"));
        let err = check_status(StatusCode::NOT_FOUND).unwrap_err();
        assert!(matches!(err, Error::Http { status: 404, ref message } if message == "Not Found"));
        let err = check_status(StatusCode::BAD_GATEWAY).unwrap_err();
        assert!(matches!(
            err,
            Error::Http { status: 502, ref message } if message == "Server Error"
        ));
        let err = check_status(StatusCode::IM_A_TEAPOT).unwrap_err();
        assert!(matches!(err, Error::Http { status: 418, ref message } if message == "HTTP Error"));
    }

    #[test]
    fn filters_combine() {
        let entries = vec![
            entry(1, "00:00:00:00:00:01", "1"),
            entry(1, "00:00:00:00:00:02", "2"),
            entry(10, "00:00:00:00:00:03", "2"),
        ];
        assert_eq!(filter_entries(entries.clone(), None, None).len(), 3);
        assert_eq!(filter_entries(entries.clone(), Some(1), None).len(), 2);
        assert_eq!(filter_entries(entries.clone(), None, Some("2")).len(), 2);
        let both = filter_entries(entries, Some(10), Some("2"));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].mac_address, "00:00:00:00:00:03");
    }
}
