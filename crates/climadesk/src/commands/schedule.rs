//! Schedule handlers: show, export, and run a time-sliced AC plan.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use climadesk_core::{ApiClient, Outcome, RunReport, Schedule, ScheduleRunner};

use crate::cli::{GlobalOpts, OutputFormat, ScheduleArgs, ScheduleCommand, ScheduleSource};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Slice")]
    slice: usize,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Commands")]
    commands: String,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Slice")]
    slice: usize,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Command")]
    command: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Error")]
    message: String,
}

fn plan_rows(schedule: &Schedule) -> Vec<PlanRow> {
    schedule
        .slices
        .iter()
        .enumerate()
        .flat_map(|(index, slice)| {
            slice.actions.iter().map(move |(room, commands)| PlanRow {
                slice: index + 1,
                room: room.to_string(),
                commands: commands
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            })
        })
        .collect()
}

fn plan_table(schedule: &Schedule) -> String {
    format!(
        "{}\n{} slices, {} commands, {}s between slices, {}ms between a room's commands",
        output::render_table(&plan_rows(schedule)),
        schedule.slices.len(),
        schedule.command_count(),
        schedule.interval_secs,
        schedule.command_gap_ms,
    )
}

fn failure_row(slice: usize, o: &Outcome) -> FailureRow {
    let error = o.error.as_ref();
    FailureRow {
        slice: slice + 1,
        room: o.room.to_string(),
        command: o.command.to_string(),
        kind: output::cell(error.and_then(|e| e.kind)),
        message: error.map(|e| e.message.clone()).unwrap_or_default(),
    }
}

fn report_summary(report: &RunReport, color: bool) -> String {
    let failures: Vec<FailureRow> = report
        .slices
        .iter()
        .flat_map(|s| s.failures().map(move |o| failure_row(s.index, o)))
        .collect();

    let mut out = format!(
        "{}  {} slices, {} succeeded, {} failed{}",
        output::status_mark(report.is_success(), color),
        report.slices.len(),
        report.succeeded(),
        report.failed(),
        if report.cancelled { " (cancelled)" } else { "" },
    );
    if !failures.is_empty() {
        out = format!("{}\n{out}", output::render_table(&failures));
    }
    out
}

// ── Helpers ─────────────────────────────────────────────────────────

fn load(source: &ScheduleSource) -> Result<Schedule, CliError> {
    match source.file {
        Some(ref path) => Ok(Schedule::from_file(path)?),
        None => Ok(Schedule::acceptance()),
    }
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX));
    if let Ok(style) = ProgressStyle::with_template("{spinner} slice {pos}/{len} {wide_bar} {msg}")
    {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Cancel `token` on Ctrl-C.
fn cancel_on_interrupt(token: &CancellationToken) {
    let token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current slice");
            token.cancel();
        }
    });
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &ApiClient,
    args: ScheduleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ScheduleCommand::Show { source } => {
            let schedule = load(&source)?;
            let out = output::render_single(&global.output, &schedule, plan_table, |s| {
                s.rooms()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScheduleCommand::Export => {
            let text = Schedule::acceptance().to_toml()?;
            output::print_output(text.trim_end(), global.quiet);
            Ok(())
        }

        ScheduleCommand::Run {
            source,
            interval,
            gap_ms,
        } => {
            let mut schedule = load(&source)?;
            if let Some(secs) = interval {
                schedule.interval_secs = secs;
            }
            if let Some(ms) = gap_ms {
                schedule.command_gap_ms = ms;
            }

            let cancel = CancellationToken::new();
            cancel_on_interrupt(&cancel);

            let bar = progress_bar(
                schedule.slices.len(),
                global.quiet || !matches!(global.output, OutputFormat::Table),
            );
            tracing::info!(
                slices = schedule.slices.len(),
                commands = schedule.command_count(),
                "running schedule"
            );

            let report = ScheduleRunner::new(client)
                .with_cancellation(cancel)
                .run_with(&schedule, |slice| {
                    let failed = slice.failures().count();
                    bar.set_message(if failed == 0 {
                        String::new()
                    } else {
                        format!("{failed} failed in slice {}", slice.index + 1)
                    });
                    bar.inc(1);
                })
                .await;
            bar.finish_and_clear();

            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &report,
                |r| report_summary(r, color),
                |r| {
                    r.outcomes()
                        .map(|o| format!("{} {} {}", o.room, o.command, output::status_mark(o.is_success(), false)))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);

            if report.cancelled {
                return Err(CliError::Cancelled);
            }
            if report.failed() > 0 {
                return Err(CliError::ScheduleFailed {
                    failed: report.failed(),
                    total: report.failed() + report.succeeded(),
                });
            }
            Ok(())
        }
    }
}
