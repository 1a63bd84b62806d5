//! AC control handlers.

use serde::Serialize;

use climadesk_core::{AcState, ApiClient, Command, FanSpeed, RoomNumber};

use crate::cli::{AcArgs, AcCommand, FanSpeedArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<FanSpeedArg> for FanSpeed {
    fn from(arg: FanSpeedArg) -> Self {
        match arg {
            FanSpeedArg::Low => Self::Low,
            FanSpeedArg::Medium => Self::Medium,
            FanSpeedArg::High => Self::High,
        }
    }
}

#[derive(Serialize)]
struct Applied<'a> {
    room: &'a RoomNumber,
    command: Command,
    state: &'a AcState,
}

fn print_applied(room: &RoomNumber, command: Command, state: &AcState, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    let applied = Applied {
        room,
        command,
        state,
    };
    let out = output::render_single(
        &global.output,
        &applied,
        |a| format!("{}  {:<12}  {}", a.room, a.command.to_string(), output::ac_line(a.state, color)),
        |a| a.state.power.to_string(),
    );
    output::print_output(&out, global.quiet);
}

/// Parse every command before sending any, so a typo aborts the batch.
fn parse_commands(raw: &[String]) -> Result<Vec<Command>, CliError> {
    raw.iter()
        .map(|s| s.parse::<Command>().map_err(CliError::from))
        .collect()
}

pub async fn handle(client: &ApiClient, args: AcArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (room, commands) = match args.command {
        AcCommand::On { room } => (room, vec![Command::TurnOn]),
        AcCommand::Off { room } => (room, vec![Command::TurnOff]),
        AcCommand::Speed { room, speed } => (room, vec![Command::SetSpeed(speed.into())]),
        AcCommand::Temp { room, celsius } => (room, vec![Command::SetTemperature(celsius)]),
        AcCommand::Send { room, commands } => (room, parse_commands(&commands)?),
    };
    let room = util::parse_room(&room)?;

    for command in commands {
        tracing::info!(%room, %command, "sending AC command");
        let state = command.execute(client, &room).await?;
        print_applied(&room, command, &state, global);
    }
    Ok(())
}
