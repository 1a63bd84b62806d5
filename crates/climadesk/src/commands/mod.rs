//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod ac;
pub mod bills;
pub mod config_cmd;
pub mod login;
pub mod reports;
pub mod rooms;
pub mod routes;
pub mod schedule;
pub mod stays;
pub mod util;

use climadesk_core::ApiClient;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &ApiClient,
    config: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::handle(client, args, config, global).await,
        Command::Rooms(args) => rooms::handle(client, args, global).await,
        Command::Bills(args) => bills::handle(client, args, global).await,
        Command::Stays(args) => stays::handle(client, args, global).await,
        Command::Ac(args) => ac::handle(client, args, global).await,
        Command::Reports(args) => reports::handle(client, args, global).await,
        Command::Schedule(args) => schedule::handle(client, args, global).await,
        // Handled before dispatch
        Command::Config(_) | Command::Routes(_) | Command::Completions(_) => Ok(()),
    }
}
