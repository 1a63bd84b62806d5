// Room status and billing endpoints.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{BillDetail, BillSummary, RoomStatus};
use crate::room::RoomNumber;

impl ApiClient {
    /// Status snapshot of one room.
    ///
    /// `GET /rooms/{roomId}/status`
    pub async fn room_status(&self, room: &RoomNumber) -> Result<RoomStatus, Error> {
        debug!(%room, "fetching room status");
        self.get(&["rooms", room.as_str(), "status"]).await
    }

    /// Status snapshots of every room.
    ///
    /// `GET /rooms/status`
    pub async fn all_rooms_status(&self) -> Result<Vec<RoomStatus>, Error> {
        debug!("fetching status of all rooms");
        self.get(&["rooms", "status"]).await
    }

    /// Aggregate bill for the room's current or most recent stay.
    ///
    /// `GET /rooms/{roomId}/bill`
    pub async fn bill_summary(&self, room: &RoomNumber) -> Result<BillSummary, Error> {
        debug!(%room, "fetching bill summary");
        self.get(&["rooms", room.as_str(), "bill"]).await
    }

    /// Itemized bill for the room's current or most recent stay.
    ///
    /// `GET /rooms/{roomId}/detail_bill`
    pub async fn bill_detail(&self, room: &RoomNumber) -> Result<BillDetail, Error> {
        debug!(%room, "fetching itemized bill");
        self.get(&["rooms", room.as_str(), "detail_bill"]).await
    }
}
