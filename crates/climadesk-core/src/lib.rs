//! Domain layer between `climadesk-api` and the CLI.
//!
//! - **[`RouteTable`]** maps navigable locations (`/aircon/203`,
//!   `/frontdesk`, ...) to the [`View`] they render, with typed
//!   navigation parameters and reverse routing.
//!
//! - **[`Command`]** is a typed AC mutation (`on`, `off`, `speed=high`,
//!   `temp=22`) routed to the matching client operation.
//!
//! - **[`Schedule`] / [`ScheduleRunner`]** replay a time-sliced plan of AC
//!   commands across rooms, concurrently per slice, and report every
//!   outcome without retrying.
//!
//! - **[`ClientConfig`]** is the runtime description of how to reach the
//!   backend; the CLI builds one from a profile and calls
//!   [`ClientConfig::build_client`].

pub mod command;
pub mod config;
pub mod error;
pub mod routes;
pub mod schedule;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Command;
pub use config::{ClientConfig, DEFAULT_SERVER, TlsVerification};
pub use error::CoreError;
pub use routes::{NavParams, Resolution, Route, RouteError, RouteTable, Target, View};
pub use schedule::{Outcome, OutcomeError, RunReport, Schedule, ScheduleRunner, Slice, SliceReport};

// Value types shared with the client crate.
pub use climadesk_api::{
    AcState, ApiClient, ErrorKind, FanSpeed, PowerState, RoomNumber, TemperatureBounds,
};
