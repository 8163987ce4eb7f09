use reqwest::Method;
use time::OffsetDateTime;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{ParkingLot, ParkingSpot};
use crate::utils::{format_timestamp, validate_id};

impl ApiClient {
    pub async fn parking_lots(&self) -> Result<Vec<ParkingLot>, ApiError> {
        let builder = self.request(Method::GET, "/api/parking-lots").await;
        self.send_json(builder).await
    }

    /// All spots. Restricted to admins on most deployments.
    pub async fn parking_spots(&self) -> Result<Vec<ParkingSpot>, ApiError> {
        let builder = self.request(Method::GET, "/api/parking-spots").await;
        self.send_json(builder).await
    }

    pub async fn spots_for_lot(&self, lot_id: &str) -> Result<Vec<ParkingSpot>, ApiError> {
        validate_id(lot_id, "Lot ID")?;
        let path = format!("/api/parking-spots/lot/{}", lot_id.trim());
        let builder = self.request(Method::GET, &path).await;
        self.send_json(builder).await
    }

    /// Spots in `lot_id` free for the whole of `[start, end)`.
    pub async fn available_spots(
        &self,
        lot_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<ParkingSpot>, ApiError> {
        validate_id(lot_id, "Lot ID")?;
        if end <= start {
            return Err(ApiError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        let start = format_timestamp(start)?;
        let end = format_timestamp(end)?;

        let builder = self
            .request(Method::POST, "/api/parking-spots/available")
            .await
            .query(&[
                ("lotId", lot_id.trim()),
                ("startTime", start.as_str()),
                ("endTime", end.as_str()),
            ]);
        self.send_json(builder).await
    }
}
