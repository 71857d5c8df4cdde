//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod config_cmd;
pub mod mac_table;
pub mod poe;
pub mod ports;
pub mod system;
pub mod util;
pub mod vlans;

use aruba_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a switch-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &mut Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::MacTable(args) => mac_table::handle(controller, args, global).await,
        Command::Ports(args) => ports::handle(controller, args, global).await,
        Command::System(args) => system::handle(controller, args, global).await,
        Command::Vlans(args) => vlans::handle(controller, args, global).await,
        Command::Poe(args) => poe::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
