//! PoE command handlers.

use tabled::Tabled;

use aruba_core::{Controller, PoePortInfo};

use crate::cli::{GlobalOpts, PoeArgs, PoeCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PoeRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "PoE")]
    enabled: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Power (W)")]
    power: String,
}

impl PoeRow {
    fn new(p: &PoePortInfo, color: bool) -> Self {
        let label = if p.poe_enabled { "Enabled" } else { "Disabled" };
        Self {
            port: p.interface_name.clone(),
            enabled: output::paint_state(label, p.poe_enabled, color),
            status: p.power_status.clone().unwrap_or_default(),
            power: p.power_usage.map(|w| format!("{w:.1}")).unwrap_or_default(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: PoeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PoeCommand::Status => {
            let ports = controller.poe_ports().await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &ports,
                |p| PoeRow::new(p, color),
                |p| format!("{}\t{}", p.interface_name, u8::from(p.poe_enabled)),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoeCommand::Enable { port } => {
            controller.set_poe(&port, true).await?;
            if !global.quiet {
                eprintln!("PoE enabled on port {port}");
            }
            Ok(())
        }

        PoeCommand::Disable { port } => {
            controller.set_poe(&port, false).await?;
            if !global.quiet {
                eprintln!("PoE disabled on port {port}");
            }
            Ok(())
        }
    }
}
