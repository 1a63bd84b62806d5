// ── AC commands ──
//
// One variant per AC mutation the backend supports. The short textual
// form (`on`, `off`, `speed=high`, `temp=22`) is what schedule files and
// the CLI use.

use std::fmt;
use std::str::FromStr;

use climadesk_api::{AcState, ApiClient, FanSpeed, RoomNumber};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
    TurnOn,
    TurnOff,
    SetSpeed(FanSpeed),
    /// Target temperature in °C; bounds are checked by the client.
    SetTemperature(f64),
}

impl Command {
    /// Send this command for `room`. Exactly one request, or none when the
    /// client rejects the value locally.
    pub async fn execute(self, client: &ApiClient, room: &RoomNumber) -> Result<AcState, CoreError> {
        debug!(%room, command = %self, "executing AC command");
        let state = match self {
            Self::TurnOn => client.turn_on_ac(room).await?,
            Self::TurnOff => client.turn_off_ac(room).await?,
            Self::SetSpeed(speed) => client.set_ac_speed(room, speed).await?,
            Self::SetTemperature(t) => client.set_ac_temperature(room, t).await?,
        };
        Ok(state)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnOn => f.write_str("on"),
            Self::TurnOff => f.write_str("off"),
            Self::SetSpeed(speed) => write!(f, "speed={speed}"),
            Self::SetTemperature(t) => write!(f, "temp={t}"),
        }
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = |reason: String| CoreError::InvalidCommand {
            input: input.to_owned(),
            reason,
        };

        let Some((key, value)) = input.split_once('=') else {
            return match input.to_ascii_lowercase().as_str() {
                "on" | "turn-on" => Ok(Self::TurnOn),
                "off" | "turn-off" => Ok(Self::TurnOff),
                _ => Err(invalid(
                    "expected on, off, speed=<low|medium|high> or temp=<celsius>".into(),
                )),
            };
        };

        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "speed" | "fan" => value
                .parse::<FanSpeed>()
                .map(Self::SetSpeed)
                .map_err(|_| invalid(format!("unknown fan speed '{value}'"))),
            "temp" | "temperature" => value
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite())
                .map(Self::SetTemperature)
                .ok_or_else(|| invalid(format!("'{value}' is not a temperature"))),
            other => Err(invalid(format!("unknown setting '{other}'"))),
        }
    }
}

impl TryFrom<String> for Command {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Command> for String {
    fn from(command: Command) -> Self {
        command.to_string()
    }
}
