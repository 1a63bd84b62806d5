//! Check-in / check-out handlers.

use climadesk_api::{CheckInRequest, CheckOutRequest, Stay};
use climadesk_core::ApiClient;

use crate::cli::{GlobalOpts, StaysArgs, StaysCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn stay_detail(stay: &Stay) -> String {
    output::detail_block(&[
        ("Stay", output::cell(stay.stay_id.as_deref())),
        ("Room", stay.room_id.to_string()),
        ("Guest", output::cell(stay.guest.as_deref())),
        ("Checked in", output::cell(stay.check_in_time.map(|t| t.to_rfc3339()))),
        ("Checked out", output::cell(stay.check_out_time.map(|t| t.to_rfc3339()))),
    ])
}

fn print_stay(stay: &Stay, global: &GlobalOpts) {
    let out = output::render_single(&global.output, stay, stay_detail, |s| {
        s.stay_id.clone().unwrap_or_else(|| s.room_id.to_string())
    });
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    client: &ApiClient,
    args: StaysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StaysCommand::CheckIn {
            room,
            guest,
            id_number,
            phone,
        } => {
            let mut request = CheckInRequest::new(util::parse_room(&room)?, guest);
            request.id_number = id_number;
            request.phone = phone;

            let stay = client.check_in(&request).await?;
            if !global.quiet {
                eprintln!("✓ Checked in to room {}", stay.room_id);
            }
            print_stay(&stay, global);
            Ok(())
        }

        StaysCommand::CheckOut { room, stay } => {
            let room = util::parse_room(&room)?;
            if !util::confirm(&format!("Check out room {room}?"), global.yes)? {
                return Ok(());
            }

            let mut request = CheckOutRequest::new(room);
            if let Some(id) = stay {
                request = request.with_stay(id);
            }

            let closed = client.check_out(&request).await?;
            if !global.quiet {
                eprintln!("✓ Checked out room {}", closed.room_id);
            }
            print_stay(&closed, global);
            Ok(())
        }
    }
}
