//! Usage and per-room report handlers.

use chrono::{DateTime, NaiveDate, Utc};
use tabled::Tabled;

use climadesk_api::{RoomReport, RoomUsage, TimeRange, UsageReport};
use climadesk_core::ApiClient;

use crate::cli::{GlobalOpts, ReportsArgs, ReportsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const DEFAULT_WINDOW: &str = "24h";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "On/Off")]
    power_cycles: u32,
    #[tabled(rename = "Dispatched")]
    schedule_count: u32,
    #[tabled(rename = "Speed Δ")]
    speed_changes: u32,
    #[tabled(rename = "Temp Δ")]
    temperature_changes: u32,
    #[tabled(rename = "Seconds")]
    duration: u64,
    #[tabled(rename = "Fee")]
    fee: String,
}

impl From<&RoomUsage> for UsageRow {
    fn from(u: &RoomUsage) -> Self {
        Self {
            room: u.room_id.to_string(),
            power_cycles: u.totals.power_cycles,
            schedule_count: u.totals.schedule_count,
            speed_changes: u.totals.speed_changes,
            temperature_changes: u.totals.temperature_changes,
            duration: u.totals.duration_secs,
            fee: format!("{:.2}", u.totals.fee),
        }
    }
}

fn usage_table(report: &UsageReport) -> String {
    if report.is_empty() {
        return "No activity in range".into();
    }
    let rows: Vec<UsageRow> = report.rooms.iter().map(|u| UsageRow::from(u)).collect();
    format!(
        "{}\nTotal fee: {:.2}",
        output::render_table(&rows),
        report.total_fee
    )
}

fn room_detail(report: &RoomReport, color: bool) -> String {
    let t = &report.totals;
    output::detail_block(&[
        ("Room", report.room_id.to_string()),
        (
            "AC",
            report
                .ac
                .as_ref()
                .map_or_else(|| "-".into(), |ac| output::ac_line(ac, color)),
        ),
        ("On/Off", t.power_cycles.to_string()),
        ("Dispatched", t.schedule_count.to_string()),
        ("Speed changes", t.speed_changes.to_string()),
        ("Temp changes", t.temperature_changes.to_string()),
        ("Seconds", t.duration_secs.to_string()),
        ("Fee", format!("{:.2}", t.fee)),
    ])
}

// ── Range parsing ───────────────────────────────────────────────────

/// RFC 3339 timestamp, or a bare date meaning midnight UTC.
fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("'{raw}' is neither RFC 3339 nor YYYY-MM-DD"),
        })
}

fn window_ending(now: DateTime<Utc>, raw: &str) -> Result<TimeRange, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "last".into(),
        reason,
    };
    let span = humantime::parse_duration(raw).map_err(|e| invalid(e.to_string()))?;
    let span = chrono::Duration::from_std(span).map_err(|e| invalid(e.to_string()))?;
    let start = now
        .checked_sub_signed(span)
        .ok_or_else(|| invalid(format!("'{raw}' reaches before the calendar starts")))?;
    Ok(TimeRange::new(start, now)?)
}

fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    last: Option<&str>,
    now: DateTime<Utc>,
) -> Result<TimeRange, CliError> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(TimeRange::new(
            parse_instant("from", from)?,
            parse_instant("to", to)?,
        )?),
        _ => window_ending(now, last.unwrap_or(DEFAULT_WINDOW)),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ReportsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ReportsCommand::Usage { from, to, last } => {
            let range = resolve_range(from.as_deref(), to.as_deref(), last.as_deref(), Utc::now())?;
            tracing::debug!(start = %range.start(), end = %range.end(), "usage report");

            let report = client.usage_report(&range).await?;
            let out = output::render_single(&global.output, &report, usage_table, |r| {
                r.rooms
                    .iter()
                    .map(|u| u.room_id.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReportsCommand::Room { room } => {
            let room = util::parse_room(&room)?;
            let report = client.room_report(&room).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &report,
                |r| room_detail(r, color),
                |r| format!("{:.2}", r.totals.fee),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn default_window_is_last_day() {
        let range = resolve_range(None, None, None, now()).unwrap();
        assert_eq!(range.end(), now());
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn last_accepts_humantime() {
        let range = resolve_range(None, None, Some("90min"), now()).unwrap();
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2025, 6, 2, 10, 30, 0).unwrap());
        assert!(resolve_range(None, None, Some("soon"), now()).is_err());
    }

    #[test]
    fn explicit_bounds_accept_dates_and_timestamps() {
        let range =
            resolve_range(Some("2025-06-01"), Some("2025-06-01T08:00:00+08:00"), None, now())
                .unwrap();
        assert_eq!(range.start(), Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
        assert!(range.is_empty());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = resolve_range(Some("2025-06-02"), Some("2025-06-01"), None, now()).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn malformed_date_names_the_flag() {
        match resolve_range(Some("June 1"), Some("2025-06-02"), None, now()) {
            Err(CliError::Validation { field, .. }) => assert_eq!(field, "from"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
