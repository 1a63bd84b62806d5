//! Time-sliced AC schedules.
//!
//! A [`Schedule`] is an ordered list of slices, each mapping rooms to the
//! commands they receive in that slice. [`ScheduleRunner`] replays it
//! against the backend: rooms within a slice run concurrently, a room's
//! own commands run in order, and the runner waits the schedule interval
//! between slices. Failures are recorded and never retried.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use climadesk_api::{AcState, ApiClient, ErrorKind, FanSpeed, RoomNumber};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::command::Command;
use crate::error::CoreError;

const DEFAULT_INTERVAL_SECS: u64 = 20;
const DEFAULT_COMMAND_GAP_MS: u64 = 800;

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_command_gap_ms() -> u64 {
    DEFAULT_COMMAND_GAP_MS
}

// ── Schedule definition ──────────────────────────────────────────────

/// Commands each room receives in one time slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    #[serde(default)]
    pub actions: BTreeMap<RoomNumber, Vec<Command>>,
}

impl Slice {
    pub fn is_empty(&self) -> bool {
        self.actions.values().all(Vec::is_empty)
    }

    pub fn command_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    fn with(mut self, room: &str, commands: &[Command]) -> Self {
        if let Ok(room) = RoomNumber::new(room) {
            self.actions.insert(room, commands.to_vec());
        }
        self
    }
}

/// A replayable plan of AC commands.
///
/// ```toml
/// interval_secs = 20
/// command_gap_ms = 800
///
/// [[slice]]
/// actions = { "101" = ["on"] }
///
/// [[slice]]
/// actions = { "101" = ["temp=18"], "102" = ["on"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Pause between the end of one slice and the start of the next.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Pause between consecutive commands for the same room.
    #[serde(default = "default_command_gap_ms")]
    pub command_gap_ms: u64,
    #[serde(default, rename = "slice")]
    pub slices: Vec<Slice>,
}

impl Schedule {
    pub fn from_toml(text: &str) -> Result<Self, CoreError> {
        toml::from_str(text).map_err(|e| CoreError::Schedule {
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| CoreError::Schedule {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Schedule {
            message: e.to_string(),
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn command_gap(&self) -> Duration {
        Duration::from_millis(self.command_gap_ms)
    }

    pub fn command_count(&self) -> usize {
        self.slices.iter().map(Slice::command_count).sum()
    }

    /// Every room the schedule touches, sorted.
    pub fn rooms(&self) -> Vec<RoomNumber> {
        let mut rooms: Vec<RoomNumber> = self
            .slices
            .iter()
            .flat_map(|s| s.actions.keys().cloned())
            .collect();
        rooms.sort();
        rooms.dedup();
        rooms
    }

    /// The 26-slice acceptance plan over rooms 101, 102, 103, 201 and 202.
    pub fn acceptance() -> Self {
        use Command::{SetSpeed, SetTemperature, TurnOff, TurnOn};
        use FanSpeed::{High, Low, Medium};

        let s = Slice::default;
        let slices = vec![
            s().with("101", &[TurnOn]),
            s().with("101", &[SetTemperature(18.0)])
                .with("102", &[TurnOn])
                .with("202", &[TurnOn]),
            s().with("103", &[TurnOn]),
            s().with("102", &[SetTemperature(19.0)])
                .with("201", &[TurnOn]),
            s().with("202", &[SetTemperature(22.0)]),
            s().with("101", &[SetSpeed(High)]),
            s().with("102", &[TurnOff]),
            s().with("102", &[TurnOn]).with("202", &[SetSpeed(High)]),
            s(),
            s().with("101", &[SetTemperature(22.0)])
                .with("201", &[SetTemperature(18.0), SetSpeed(High)]),
            s(),
            s().with("102", &[SetTemperature(22.0)]),
            s().with("202", &[SetSpeed(Low)]),
            s(),
            s().with("101", &[TurnOff])
                .with("103", &[SetTemperature(24.0), SetSpeed(Low)]),
            s().with("202", &[SetTemperature(20.0), SetSpeed(High)]),
            s().with("102", &[TurnOff]),
            s().with("103", &[SetSpeed(High)]),
            s().with("101", &[TurnOn])
                .with("201", &[SetTemperature(20.0), SetSpeed(Medium)]),
            s().with("102", &[TurnOn]),
            s().with("202", &[SetTemperature(25.0)]),
            s(),
            s().with("103", &[TurnOff]),
            s().with("202", &[TurnOff]),
            s().with("101", &[TurnOff]),
            s().with("102", &[TurnOff]).with("201", &[TurnOff]),
        ];

        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            command_gap_ms: DEFAULT_COMMAND_GAP_MS,
            slices,
        }
    }
}

// ── Run reports ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeError {
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl From<CoreError> for OutcomeError {
    fn from(err: CoreError) -> Self {
        Self {
            kind: err.api_kind(),
            message: err.to_string(),
        }
    }
}

/// Result of one command for one room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub room: RoomNumber,
    pub command: Command,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<AcState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceReport {
    pub index: usize,
    pub outcomes: Vec<Outcome>,
}

impl SliceReport {
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub slices: Vec<SliceReport>,
    /// The run stopped early because its token was cancelled.
    pub cancelled: bool,
}

impl RunReport {
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.slices.iter().flat_map(|s| s.outcomes.iter())
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes().filter(|o| !o.is_success()).count()
    }

    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed() == 0
    }
}

// ── Runner ───────────────────────────────────────────────────────────

pub struct ScheduleRunner<'a> {
    client: &'a ApiClient,
    cancel: CancellationToken,
}

impl<'a> ScheduleRunner<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the run when `cancel` fires. The partial report is returned.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run(&self, schedule: &Schedule) -> RunReport {
        self.run_with(schedule, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_slice` after each slice.
    pub async fn run_with(
        &self,
        schedule: &Schedule,
        mut on_slice: impl FnMut(&SliceReport),
    ) -> RunReport {
        let mut report = RunReport::default();
        let last = schedule.slices.len().saturating_sub(1);

        for (index, slice) in schedule.slices.iter().enumerate() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let slice_report = self.run_slice(index, slice, schedule.command_gap()).await;
            for failure in slice_report.failures() {
                if let Some(err) = &failure.error {
                    warn!(slice = index, room = %failure.room, command = %failure.command, error = %err.message, "command failed");
                }
            }
            on_slice(&slice_report);
            report.slices.push(slice_report);

            if index < last && !self.pause(schedule.interval()).await {
                report.cancelled = true;
                break;
            }
        }

        if self.cancel.is_cancelled() {
            report.cancelled = true;
        }
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "schedule run finished"
        );
        report
    }

    async fn run_slice(&self, index: usize, slice: &Slice, gap: Duration) -> SliceReport {
        if slice.is_empty() {
            info!(slice = index, "no actions");
            return SliceReport {
                index,
                outcomes: Vec::new(),
            };
        }

        info!(slice = index, rooms = slice.actions.len(), "running slice");
        let rooms = slice
            .actions
            .iter()
            .map(|(room, commands)| self.run_room(room, commands, gap));
        let outcomes = join_all(rooms).await.into_iter().flatten().collect();

        SliceReport { index, outcomes }
    }

    async fn run_room(&self, room: &RoomNumber, commands: &[Command], gap: Duration) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(commands.len());
        for (i, &command) in commands.iter().enumerate() {
            if i > 0 && !self.pause(gap).await {
                break;
            }
            let result = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                result = command.execute(self.client, room) => result,
            };
            let (state, error) = match result {
                Ok(state) => (Some(state), None),
                Err(e) => (None, Some(OutcomeError::from(e))),
            };
            outcomes.push(Outcome {
                room: room.clone(),
                command,
                state,
                error,
            });
        }
        outcomes
    }

    /// Sleep for `duration`; `false` if cancelled first.
    async fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return !self.cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn room(n: &str) -> RoomNumber {
        RoomNumber::new(n).unwrap()
    }

    #[test]
    fn acceptance_plan_shape() {
        let plan = Schedule::acceptance();
        assert_eq!(plan.slices.len(), 26);
        assert_eq!(plan.interval(), Duration::from_secs(20));
        assert_eq!(plan.command_gap(), Duration::from_millis(800));
        assert_eq!(
            plan.rooms(),
            ["101", "102", "103", "201", "202"].map(room).to_vec()
        );
        let idle: Vec<usize> = plan
            .slices
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(idle, vec![8, 10, 13, 21]);
    }

    #[test]
    fn acceptance_plan_keeps_per_room_order() {
        let plan = Schedule::acceptance();
        assert_eq!(
            plan.slices[9].actions[&room("201")],
            vec![Command::SetTemperature(18.0), Command::SetSpeed(FanSpeed::High)]
        );
        assert_eq!(
            plan.slices[25].actions.keys().cloned().collect::<Vec<_>>(),
            vec![room("102"), room("201")]
        );
    }

    #[test]
    fn toml_round_trip_preserves_plan() {
        let plan = Schedule::acceptance();
        let text = plan.to_toml().unwrap();
        assert_eq!(Schedule::from_toml(&text).unwrap(), plan);
    }

    #[test]
    fn parses_minimal_toml() {
        let plan = Schedule::from_toml(
            r#"
            interval_secs = 0

            [[slice]]
            actions = { "203" = ["on", "speed=high"] }

            [[slice]]
            "#,
        )
        .unwrap();
        assert_eq!(plan.command_gap_ms, 800);
        assert_eq!(plan.slices.len(), 2);
        assert!(plan.slices[1].is_empty());
        assert_eq!(plan.command_count(), 2);
    }

    #[test]
    fn bad_command_in_toml_is_schedule_error() {
        let err = Schedule::from_toml(
            r#"
            [[slice]]
            actions = { "203" = ["blast"] }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Schedule { .. }));
    }

    #[test]
    fn bad_room_in_toml_is_schedule_error() {
        let err = Schedule::from_toml(
            r#"
            [[slice]]
            actions = { "2 03" = ["on"] }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Schedule { .. }));
    }

    #[test]
    fn run_report_counts() {
        let ok = Outcome {
            room: room("101"),
            command: Command::TurnOn,
            state: None,
            error: None,
        };
        let failed = Outcome {
            error: Some(OutcomeError {
                kind: Some(ErrorKind::Conflict),
                message: "out of service".into(),
            }),
            ..ok.clone()
        };
        let report = RunReport {
            slices: vec![SliceReport {
                index: 0,
                outcomes: vec![ok, failed],
            }],
            cancelled: false,
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(report.slices[0].failures().count(), 1);
    }
}
