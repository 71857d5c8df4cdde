//! VLAN command handlers.

use tabled::Tabled;

use aruba_core::{Controller, VlanInfo};

use crate::cli::{GlobalOpts, VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "VLAN ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&VlanInfo> for VlanRow {
    fn from(v: &VlanInfo) -> Self {
        Self {
            id: v.vlan_id,
            name: v.vlan_name.clone(),
            status: v.status.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: VlansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VlansCommand::List => {
            let vlans = controller.vlans().await?;
            let out = output::render_list(&global.output, &vlans, |v| VlanRow::from(v), |v| {
                format!("{}\t{}", v.vlan_id, v.vlan_name)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
