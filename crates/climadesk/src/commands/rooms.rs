//! Room status handlers.

use tabled::Tabled;

use climadesk_api::RoomStatus;
use climadesk_core::ApiClient;

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Guest")]
    guest: String,
    #[tabled(rename = "AC")]
    power: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Target °C")]
    target: String,
    #[tabled(rename = "Current °C")]
    current: String,
}

impl From<&RoomStatus> for RoomRow {
    fn from(r: &RoomStatus) -> Self {
        let ac = r.ac.as_ref();
        Self {
            room: r.room_id.to_string(),
            status: r.status.to_string(),
            guest: output::cell(r.guest.as_deref()),
            power: output::cell(ac.map(|a| a.power)),
            speed: output::cell(ac.and_then(|a| a.fan_speed)),
            target: output::cell(ac.and_then(|a| a.target_temperature)),
            current: output::cell(ac.and_then(|a| a.current_temperature)),
        }
    }
}

fn detail(r: &RoomStatus, color: bool) -> String {
    let mut pairs = vec![
        ("Room", r.room_id.to_string()),
        ("Status", r.status.to_string()),
        ("Guest", output::cell(r.guest.as_deref())),
    ];
    pairs.push((
        "AC",
        r.ac.as_ref()
            .map_or_else(|| "-".into(), |ac| output::ac_line(ac, color)),
    ));
    output::detail_block(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: RoomsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List => {
            let rooms = client.all_rooms_status().await?;
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(r),
                |r| r.room_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Status { room } => {
            let room = util::parse_room(&room)?;
            let status = client.room_status(&room).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &status,
                |s| detail(s, color),
                |s| s.status.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
