//! Bill handlers.

use tabled::Tabled;

use climadesk_api::{BillDetail, BillLineItem, BillSummary};
use climadesk_core::ApiClient;

use crate::cli::{BillsArgs, BillsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Seconds")]
    duration: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Fee")]
    fee: String,
}

impl From<&BillLineItem> for LineRow {
    fn from(item: &BillLineItem) -> Self {
        Self {
            start: output::cell(item.start_time.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
            end: output::cell(item.end_time.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
            duration: output::cell(item.duration_secs),
            speed: output::cell(item.fan_speed),
            rate: output::cell(item.rate),
            fee: format!("{:.2}", item.fee),
        }
    }
}

fn summary_detail(bill: &BillSummary) -> String {
    output::detail_block(&[
        ("Room", bill.room_id.to_string()),
        ("Guest", output::cell(bill.guest.as_deref())),
        ("Checked in", output::cell(bill.check_in_time.map(|t| t.to_rfc3339()))),
        ("Checked out", output::cell(bill.check_out_time.map(|t| t.to_rfc3339()))),
        ("Room fee", output::cell(bill.room_fee.map(|f| format!("{f:.2}")))),
        ("AC fee", output::cell(bill.ac_fee.map(|f| format!("{f:.2}")))),
        ("Total", format!("{:.2}", bill.total)),
    ])
}

fn itemized(bill: &BillDetail) -> String {
    let rows: Vec<LineRow> = bill.items.iter().map(|i| LineRow::from(i)).collect();
    let mut out = output::render_table(&rows);
    if let Some(total) = bill.total {
        out.push_str(&format!("\nTotal: {total:.2}"));
    }
    out
}

pub async fn handle(
    client: &ApiClient,
    args: BillsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BillsCommand::Summary { room } => {
            let room = util::parse_room(&room)?;
            let bill = client.bill_summary(&room).await?;
            let out = output::render_single(&global.output, &bill, summary_detail, |b| {
                format!("{:.2}", b.total)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BillsCommand::Detail { room } => {
            let room = util::parse_room(&room)?;
            let bill = client.bill_detail(&room).await?;
            let out = output::render_single(&global.output, &bill, itemized, |b| {
                b.items
                    .iter()
                    .map(|i| format!("{:.2}", i.fee))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
