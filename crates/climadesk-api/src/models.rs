// Wire types for the climate-control and billing backend.
//
// Field names follow the backend's camelCase JSON. Aliases cover the
// alternate spellings the backend has used for the same field; the
// canonical name is what we serialize.

use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::de;
use crate::error::Error;
use crate::room::RoomNumber;

// ── Enumerations ─────────────────────────────────────────────────────

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Occupancy {
    #[serde(alias = "OCCUPIED")]
    Occupied,
    #[serde(alias = "VACANT", alias = "available", alias = "AVAILABLE")]
    Vacant,
    #[serde(alias = "OUT_OF_SERVICE", alias = "out_of_service", alias = "maintenance")]
    OutOfService,
}

/// AC power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

// Accepts `"on"`/`"off"` (any case) as well as the boolean `isOn` form.
impl<'de> Deserialize<'de> for PowerState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(on) => Ok(Self::from(on)),
            Raw::Text(s) => match s.to_ascii_lowercase().as_str() {
                "on" | "true" => Ok(Self::On),
                "off" | "false" => Ok(Self::Off),
                other => Err(serde::de::Error::custom(format!(
                    "unknown power state {other:?}"
                ))),
            },
        }
    }
}

/// Fan speed levels supported by the room units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FanSpeed {
    #[serde(alias = "LOW")]
    Low,
    #[serde(alias = "MEDIUM", alias = "mid", alias = "MID")]
    #[strum(to_string = "medium", serialize = "mid")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
}

/// Operating mode reported by a unit. Read-only from the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AcMode {
    #[serde(alias = "COOLING", alias = "cool", alias = "COOL")]
    Cooling,
    #[serde(alias = "HEATING", alias = "heat", alias = "HEAT")]
    Heating,
}

// ── Temperature bounds ───────────────────────────────────────────────

/// Inclusive range of target temperatures the backend accepts, in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for TemperatureBounds {
    fn default() -> Self {
        Self {
            min: 16.0,
            max: 30.0,
        }
    }
}

impl TemperatureBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, Error> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::validation(format!(
                "invalid temperature bounds [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns `temperature` unchanged if it lies within the bounds.
    pub fn check(&self, temperature: f64) -> Result<f64, Error> {
        if temperature.is_finite() && (self.min..=self.max).contains(&temperature) {
            Ok(temperature)
        } else {
            Err(Error::validation(format!(
                "target temperature {temperature} outside allowed range [{}, {}]",
                self.min, self.max
            )))
        }
    }
}

// ── AC state ─────────────────────────────────────────────────────────

/// Snapshot of one room's AC unit as reported by the backend.
///
/// Optional fields are left empty when the backend omits them; the
/// client never fills in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcState {
    #[serde(default, alias = "roomNumber", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomNumber>,
    #[serde(alias = "isOn", alias = "powerState", alias = "status")]
    pub power: PowerState,
    #[serde(default, alias = "speed", skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<FanSpeed>,
    #[serde(default, alias = "targetTemp", skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<f64>,
    #[serde(default, alias = "currentTemp", skip_serializing_if = "Option::is_none")]
    pub current_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AcMode>,
}

// ── Rooms ────────────────────────────────────────────────────────────

/// Status snapshot of a single room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(alias = "state", alias = "occupancy")]
    pub status: Occupancy,
    #[serde(default, alias = "guestName", skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
    #[serde(default, alias = "acState", alias = "airConditioner", skip_serializing_if = "Option::is_none")]
    pub ac: Option<AcState>,
}

// ── Bills ────────────────────────────────────────────────────────────

/// Aggregate bill for a room's current or most recent stay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(alias = "totalFee", alias = "totalCost", alias = "amount")]
    pub total: f64,
    #[serde(default, alias = "acCost", skip_serializing_if = "Option::is_none")]
    pub ac_fee: Option<f64>,
    #[serde(default, alias = "roomCost", skip_serializing_if = "Option::is_none")]
    pub room_fee: Option<f64>,
    #[serde(default, alias = "guestName", skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime<Utc>>,
}

/// One itemized charge: a continuous AC service interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLineItem {
    #[serde(default, alias = "requestTime", deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    #[serde(default, alias = "speed", skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<FanSpeed>,
    #[serde(default, alias = "feeRate", skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(alias = "cost", alias = "amount")]
    pub fee: f64,
}

/// Itemized bill. A distinct shape from [`BillSummary`]; never derived
/// from it on the client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDetail {
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(default, alias = "details", alias = "records")]
    pub items: Vec<BillLineItem>,
    #[serde(default, alias = "totalFee", alias = "totalCost", skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

// ── Stays ────────────────────────────────────────────────────────────

/// Body of `POST /check-in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub room_id: RoomNumber,
    pub guest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CheckInRequest {
    pub fn new(room_id: RoomNumber, guest: impl Into<String>) -> Self {
        Self {
            room_id,
            guest: guest.into(),
            id_number: None,
            phone: None,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.guest.trim().is_empty() {
            return Err(Error::validation("guest name must not be empty"));
        }
        Ok(())
    }
}

/// Body of `POST /check-out`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutRequest {
    pub room_id: RoomNumber,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stay_id: Option<String>,
}

impl CheckOutRequest {
    pub fn new(room_id: RoomNumber) -> Self {
        Self {
            room_id,
            stay_id: None,
        }
    }

    pub fn with_stay(mut self, stay_id: impl Into<String>) -> Self {
        self.stay_id = Some(stay_id.into());
        self
    }
}

/// A guest's occupation of a room, open until check-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    #[serde(default, alias = "id", deserialize_with = "de::opt_string_or_number", skip_serializing_if = "Option::is_none")]
    pub stay_id: Option<String>,
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(default, alias = "guestName", skip_serializing_if = "Option::is_none")]
    pub guest: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<DateTime<Utc>>,
}

impl Stay {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// Body of `POST /login`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub account: &'a str,
    pub password: &'a str,
}

/// Raw login response; converted into [`Session`] so the token never
/// lands in a `Debug`/`Serialize` path.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionResponse {
    #[serde(default, alias = "username")]
    pub account: Option<String>,
    #[serde(default, alias = "userType")]
    pub role: Option<String>,
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: String,
    pub role: Option<String>,
    token: Option<SecretString>,
}

impl Session {
    pub(crate) fn from_response(requested_account: &str, resp: SessionResponse) -> Self {
        Self {
            account: resp.account.unwrap_or_else(|| requested_account.to_owned()),
            role: resp.role,
            token: resp.token.filter(|t| !t.is_empty()).map(SecretString::from),
        }
    }

    /// Credential issued by the backend, if it uses one.
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }
}

// ── Reports ──────────────────────────────────────────────────────────

/// Half-open reporting interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, Error> {
        if end < start {
            return Err(Error::validation(format!(
                "report range ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Zero-width ranges contain no instant.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub(crate) fn query(&self) -> [(&'static str, String); 2] {
        [
            ("startTime", self.start.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("endTime", self.end.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ]
    }
}

/// Activity counters shared by the usage report rows and the per-room report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageTotals {
    #[serde(default, alias = "onOffCount", alias = "switchCount")]
    pub power_cycles: u32,
    #[serde(default, alias = "dispatchCount")]
    pub schedule_count: u32,
    #[serde(default, alias = "speedChangeCount")]
    pub speed_changes: u32,
    #[serde(default, alias = "tempChangeCount", alias = "temperatureChangeCount")]
    pub temperature_changes: u32,
    #[serde(default, alias = "totalDuration", alias = "serviceDuration")]
    pub duration_secs: u64,
    #[serde(default, alias = "totalFee", alias = "cost")]
    pub fee: f64,
}

/// One room's row in a usage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUsage {
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(flatten)]
    pub totals: UsageTotals,
}

/// Aggregate activity over a [`TimeRange`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "roomReports", alias = "items")]
    pub rooms: Vec<RoomUsage>,
    #[serde(default, alias = "totalCost")]
    pub total_fee: f64,
}

impl UsageReport {
    /// The report for a range that contains no instant.
    pub fn empty(range: &TimeRange) -> Self {
        Self {
            start_time: Some(range.start()),
            end_time: Some(range.end()),
            rooms: Vec::new(),
            total_fee: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Per-room report: activity counters plus the unit's current AC state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomReport {
    #[serde(alias = "roomNumber")]
    pub room_id: RoomNumber,
    #[serde(default, alias = "acState", alias = "airConditioner", skip_serializing_if = "Option::is_none")]
    pub ac: Option<AcState>,
    #[serde(flatten)]
    pub totals: UsageTotals,
}
