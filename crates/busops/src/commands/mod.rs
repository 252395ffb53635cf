//! Command dispatch: bridges CLI args -> page models -> output formatting.

pub mod buy;
pub mod categories;
pub mod config_cmd;
pub mod dashboard;
pub mod lines;
pub mod route;
pub mod stops;
pub mod tickets;
pub mod util;

use busops_core::TicketingApi;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    api: &dyn TicketingApi,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        Command::Dashboard => dashboard::handle(api, settings).await,
        Command::Stops(args) => stops::handle(api, args, settings).await,
        Command::Lines(args) => lines::handle(api, args, settings).await,
        Command::Route(args) => route::handle(api, args, settings).await,
        Command::Categories(args) => categories::handle(api, args, settings).await,
        Command::Tickets(args) => tickets::handle(api, args, settings).await,
        Command::Buy(args) => buy::handle(api, args, settings).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not talk to the server".into(),
        )),
    }
}
