// Check-in / check-out endpoints.
//
// These operate on the stay record itself, so the room travels in the
// request body as part of that record rather than in the path.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CheckInRequest, CheckOutRequest, Stay};

impl ApiClient {
    /// Open a stay. An already-occupied room yields [`Error::Conflict`].
    ///
    /// `POST /check-in`
    pub async fn check_in(&self, request: &CheckInRequest) -> Result<Stay, Error> {
        request.validate()?;
        debug!(room = %request.room_id, "checking in");
        self.post(&["check-in"], request).await
    }

    /// Close the room's open stay. No open stay yields [`Error::NotFound`].
    ///
    /// `POST /check-out`
    pub async fn check_out(&self, request: &CheckOutRequest) -> Result<Stay, Error> {
        debug!(room = %request.room_id, stay = ?request.stay_id, "checking out");
        self.post(&["check-out"], request).await
    }
}
