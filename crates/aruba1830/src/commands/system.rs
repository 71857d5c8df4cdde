//! System command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use aruba_core::{Controller, LogEntry, SystemInfo};

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&LogEntry> for LogRow {
    fn from(l: &LogEntry) -> Self {
        Self {
            time: l.timestamp.clone(),
            severity: l.severity.clone(),
            message: l.message.clone(),
        }
    }
}

fn detail(info: &SystemInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Device Name:      {}", info.device_name);
    let _ = writeln!(out, "Model:            {}", info.model);
    let _ = writeln!(out, "Serial Number:    {}", info.serial_number);
    let _ = writeln!(out, "Firmware Version: {}", info.firmware_version);
    let _ = write!(out, "MAC Address:      {}", info.mac_address);
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Info => {
            let info = controller
                .system_info()
                .await?
                .ok_or_else(|| CliError::Device {
                    message: "no system information in response".into(),
                })?;
            let out = output::render_single(&global.output, &info, detail, |i| {
                i.device_name.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SystemCommand::Logs { tail } => {
            let mut logs = controller.logs().await?;
            if let Some(n) = tail {
                let skip = logs.len().saturating_sub(n);
                logs.drain(..skip);
            }
            let out = output::render_list(&global.output, &logs, |l| LogRow::from(l), |l| {
                format!("{} {} {}", l.timestamp, l.severity, l.message)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
