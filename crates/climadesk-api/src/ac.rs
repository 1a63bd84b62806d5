// Air-conditioner command endpoints.
//
// The room is addressed by the path only; bodies carry nothing but the
// changed setting.

use serde::Serialize;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AcState, FanSpeed};
use crate::room::RoomNumber;

#[derive(Serialize)]
struct SpeedBody {
    speed: FanSpeed,
}

#[derive(Serialize)]
struct TemperatureBody {
    temperature: f64,
}

impl ApiClient {
    /// `POST /ac/{roomNumber}/turn-on`. Powering on a running unit is a no-op.
    pub async fn turn_on_ac(&self, room: &RoomNumber) -> Result<AcState, Error> {
        debug!(%room, "turning AC on");
        self.post_empty(&["ac", room.as_str(), "turn-on"]).await
    }

    /// `POST /ac/{roomNumber}/turn-off`
    pub async fn turn_off_ac(&self, room: &RoomNumber) -> Result<AcState, Error> {
        debug!(%room, "turning AC off");
        self.post_empty(&["ac", room.as_str(), "turn-off"]).await
    }

    /// `POST /ac/{roomNumber}/set-speed` with `{"speed": …}`
    pub async fn set_ac_speed(&self, room: &RoomNumber, speed: FanSpeed) -> Result<AcState, Error> {
        debug!(%room, %speed, "setting AC fan speed");
        self.post(&["ac", room.as_str(), "set-speed"], &SpeedBody { speed })
            .await
    }

    /// `POST /ac/{roomNumber}/set-temperature` with `{"temperature": …}`
    ///
    /// Values outside the configured bounds fail with
    /// [`Error::Validation`] and no request is sent.
    pub async fn set_ac_temperature(
        &self,
        room: &RoomNumber,
        temperature: f64,
    ) -> Result<AcState, Error> {
        let temperature = self.temperature_bounds().check(temperature)?;
        debug!(%room, temperature, "setting AC target temperature");
        self.post(
            &["ac", room.as_str(), "set-temperature"],
            &TemperatureBody { temperature },
        )
        .await
    }
}
