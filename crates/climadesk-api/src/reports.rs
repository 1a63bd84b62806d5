// Reporting endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{RoomReport, TimeRange, UsageReport};
use crate::room::RoomNumber;

impl ApiClient {
    /// Aggregate usage over `[start, end)`.
    ///
    /// `GET /reports/usage?startTime=…&endTime=…`
    ///
    /// A zero-width range contains no instant, so it is answered locally
    /// with an empty report and no request is sent.
    pub async fn usage_report(&self, range: &TimeRange) -> Result<UsageReport, Error> {
        if range.is_empty() {
            debug!("zero-width report range, skipping request");
            return Ok(UsageReport::empty(range));
        }
        debug!(start = %range.start(), end = %range.end(), "fetching usage report");
        self.get_with_params(&["reports", "usage"], &range.query())
            .await
    }

    /// Per-room report including the unit's current AC state.
    ///
    /// `GET /reports/rooms/{roomId}`
    pub async fn room_report(&self, room: &RoomNumber) -> Result<RoomReport, Error> {
        debug!(%room, "fetching room report");
        self.get(&["reports", "rooms", room.as_str()]).await
    }
}
