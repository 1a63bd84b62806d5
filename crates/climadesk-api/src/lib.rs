//! Async client for the hotel room climate-control and billing backend.
//!
//! One [`ApiClient`] method per backend capability: login, room status,
//! bills, check-in/out, AC commands, and usage reports. Room-addressed
//! operations always carry the room number in the URL path. Failures are
//! classified into the [`ErrorKind`] taxonomy with the backend's message
//! preserved.

pub mod ac;
pub mod auth;
pub mod client;
mod de;
pub mod error;
pub mod models;
pub mod reports;
pub mod room;
pub mod rooms;
pub mod stays;
pub mod transport;

pub use client::ApiClient;
pub use error::{Error, ErrorKind};
pub use models::{
    AcMode, AcState, BillDetail, BillLineItem, BillSummary, CheckInRequest, CheckOutRequest,
    FanSpeed, Occupancy, PowerState, RoomReport, RoomStatus, RoomUsage, Session, Stay,
    TemperatureBounds, TimeRange, UsageReport, UsageTotals,
};
pub use room::RoomNumber;
pub use transport::{TlsMode, TransportConfig};
