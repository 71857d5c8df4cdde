//! MAC table command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use aruba_core::{Controller, MacTableEntry};

use crate::cli::{GlobalOpts, MacTableArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MacRow {
    #[tabled(rename = "VLAN")]
    vlan: u16,
    #[tabled(rename = "MAC Address")]
    mac: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
}

impl From<&MacTableEntry> for MacRow {
    fn from(e: &MacTableEntry) -> Self {
        Self {
            vlan: e.vlan_id,
            mac: e.mac_address.clone(),
            port: e.interface_name.clone(),
            kind: if e.is_dynamic() { "Dynamic" } else { "Static" },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: MacTableArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let entries = controller
        .mac_table(args.vlan, args.port.as_deref())
        .await?;

    let mut out = output::render_list(
        &global.output,
        &entries,
        |e| MacRow::from(e),
        |e| format!("{}\t{}\t{}", e.vlan_id, e.mac_address, e.interface_name),
    )?;
    if matches!(global.output, OutputFormat::Table) {
        let _ = write!(out, "\nTotal: {} entries", entries.len());
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
