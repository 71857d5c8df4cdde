//! Port command handlers.

use std::fmt::Write as _;

use serde::Serialize;
use tabled::Tabled;

use aruba_core::{BanOutcome, Controller, DisableOutcome, EnableOutcome, PortInfo};

use crate::cli::{GlobalOpts, OutputFormat, PortsArgs, PortsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Duplex")]
    duplex: String,
}

impl PortRow {
    fn new(p: &PortInfo, color: bool) -> Self {
        let label = if p.is_enabled() { "Enabled" } else { "Disabled" };
        Self {
            port: p.interface_name.clone(),
            status: output::paint_state(label, p.is_enabled(), color),
            link: p.operational_status.clone().unwrap_or_default(),
            speed: p.speed.clone().unwrap_or_default(),
            duplex: p.duplex.clone().unwrap_or_default(),
        }
    }
}

/// One port of the activity log, flattened for output.
#[derive(Serialize)]
struct LoggedPort {
    port: String,
    macs: Vec<String>,
}

#[derive(Tabled)]
struct LoggedPortRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "MACs at disable")]
    macs: String,
}

// ── Outcome messages ────────────────────────────────────────────────

fn describe_enable(outcome: &EnableOutcome) -> String {
    match outcome {
        EnableOutcome::All { ports } => format!("Enabled {} port(s)", ports.len()),
        EnableOutcome::Mac {
            mac,
            port,
            cached: false,
        } => format!("Port {port} (MAC: {mac}) enabled successfully"),
        EnableOutcome::Mac {
            mac,
            port,
            cached: true,
        } => format!("Port {port} (MAC: {mac}) enabled using cached mapping"),
        EnableOutcome::Port { port } => format!("Port {port} enabled successfully"),
    }
}

fn describe_disable(outcome: &DisableOutcome) -> String {
    match outcome {
        DisableOutcome::All { ports } => format!("Disabled {} port(s)", ports.len()),
        DisableOutcome::Mac { mac, port, .. } => {
            format!("Port {port} (MAC: {mac}) disabled successfully")
        }
        DisableOutcome::Port { port, .. } => format!("Port {port} disabled successfully"),
    }
}

fn describe_ban(outcome: &BanOutcome) -> String {
    match outcome {
        BanOutcome::AlreadyBanned { mac, port } => {
            format!("MAC {mac} is already banned on port {port} (cached)")
        }
        BanOutcome::Banned {
            mac,
            port,
            reenabled,
            ..
        } => {
            let mut out = String::new();
            if let Some(previous) = reenabled {
                let _ = writeln!(
                    out,
                    "Port {previous} re-enabled because MAC moved to port {port}"
                );
            }
            let _ = write!(out, "Port {port} (MAC: {mac}) banned successfully");
            out
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &mut Controller,
    args: PortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PortsCommand::List => {
            let ports = controller.ports().await?;
            let color = output::should_color(&global.color);
            let mut out = output::render_list(
                &global.output,
                &ports,
                |p| PortRow::new(p, color),
                |p| {
                    let state = if p.is_enabled() { "enabled" } else { "disabled" };
                    format!("{}\t{state}", p.interface_name)
                },
            )?;
            if matches!(global.output, OutputFormat::Table) {
                let _ = write!(out, "\nTotal: {} ports", ports.len());
            }
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Enable { target } => {
            if util::is_all(&target) && !util::confirm("Enable all ports?", global.yes)? {
                return Ok(());
            }
            let outcome = controller.enable(&target).await?;
            let out =
                output::render_single(&global.output, &outcome, describe_enable, |o| match o {
                    EnableOutcome::All { ports } => ports.join("\n"),
                    EnableOutcome::Mac { port, .. } | EnableOutcome::Port { port } => port.clone(),
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Disable { target, force } => {
            if util::is_all(&target) && !util::confirm("Disable all ports?", global.yes)? {
                return Ok(());
            }
            let outcome = controller.disable(&target, force).await?;
            let out =
                output::render_single(&global.output, &outcome, describe_disable, |o| match o {
                    DisableOutcome::All { ports } => ports.join("\n"),
                    DisableOutcome::Mac { port, .. } | DisableOutcome::Port { port, .. } => {
                        port.clone()
                    }
                })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Ban { mac, force } => {
            let outcome = controller.ban(&mac, force).await?;
            let out = output::render_single(&global.output, &outcome, describe_ban, |o| match o {
                BanOutcome::AlreadyBanned { port, .. } | BanOutcome::Banned { port, .. } => {
                    port.clone()
                }
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PortsCommand::Log => {
            let logged: Vec<LoggedPort> = controller
                .port_log_snapshot()?
                .into_iter()
                .map(|(port, macs)| LoggedPort { port, macs })
                .collect();
            let out = output::render_list(
                &global.output,
                &logged,
                |l| LoggedPortRow {
                    port: l.port.clone(),
                    macs: l.macs.join(", "),
                },
                |l| format!("{}\t{}", l.port, l.macs.join(",")),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use aruba_core::ResolvedMac;

    use super::*;

    fn mac(alias: Option<&str>) -> ResolvedMac {
        ResolvedMac {
            mac: "00:11:22:33:44:55".into(),
            alias: alias.map(str::to_owned),
        }
    }

    #[test]
    fn ban_after_move_mentions_both_ports() {
        let text = describe_ban(&BanOutcome::Banned {
            mac: mac(Some("laptop")),
            port: "6".into(),
            reenabled: Some("4".into()),
            macs: vec!["00:11:22:33:44:55".into()],
        });
        assert_eq!(
            text,
            "Port 4 re-enabled because MAC moved to port 6\n\
             Port 6 (MAC: 00:11:22:33:44:55 (alias: laptop)) banned successfully"
        );
    }

    #[test]
    fn cached_enable_is_called_out() {
        let text = describe_enable(&EnableOutcome::Mac {
            mac: mac(None),
            port: "5".into(),
            cached: true,
        });
        assert_eq!(
            text,
            "Port 5 (MAC: 00:11:22:33:44:55) enabled using cached mapping"
        );
    }

    #[test]
    fn disable_all_counts_ports() {
        let text = describe_disable(&DisableOutcome::All {
            ports: vec!["1".into(), "3".into()],
        });
        assert_eq!(text, "Disabled 2 port(s)");
    }
}
