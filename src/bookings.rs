use reqwest::Method;
use time::OffsetDateTime;

use crate::booking_window::BookingWindow;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    Booking, BookingStatus, BookingStatusUpdate, CheckInRequest, ExtendBookingRequest,
    PriceBreakup,
};
use crate::utils::{format_timestamp, normalize_vehicle_number, validate_check_in_request, validate_id};

/// What the user picked on the booking form.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub spot_id: String,
    pub lot_id: String,
    pub check_in: OffsetDateTime,
    pub check_out: OffsetDateTime,
    pub vehicle_number: String,
}

enum BookingAction {
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
    Penalty,
    Extend,
    PriceBreakup,
}

impl BookingAction {
    fn segment(&self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Cancel => "cancel",
            BookingAction::CheckIn => "checkin",
            BookingAction::CheckOut => "checkout",
            BookingAction::Penalty => "penalty",
            BookingAction::Extend => "extend",
            BookingAction::PriceBreakup => "priceBreakup",
        }
    }
}

impl ApiClient {
    /// Current bookings. The backend answers 404 when the user has none.
    pub async fn bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let user_id = self.session().require_user_id().await?;
        let path = format!("/api/users/{}/all-bookings", user_id);
        self.booking_list(&path).await
    }

    pub async fn booking_history(&self) -> Result<Vec<Booking>, ApiError> {
        let user_id = self.session().require_user_id().await?;
        let path = format!("/api/users/{}/all-bookings/history", user_id);
        self.booking_list(&path).await
    }

    async fn booking_list(&self, path: &str) -> Result<Vec<Booking>, ApiError> {
        let builder = self.request(Method::GET, path).await;
        match self.send_json::<Option<Vec<Booking>>>(builder).await {
            Ok(bookings) => Ok(bookings.unwrap_or_default()),
            Err(ApiError::EmptyResponse) => Ok(Vec::new()),
            Err(err) if err.status() == Some(404) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    pub async fn start_booking(&self, draft: &BookingDraft) -> Result<Booking, ApiError> {
        self.start_booking_at(draft, self.lot_now()).await
    }

    /// Validates the draft against the booking window as of `now` and only
    /// then asks the backend to create the booking.
    pub async fn start_booking_at(
        &self,
        draft: &BookingDraft,
        now: OffsetDateTime,
    ) -> Result<Booking, ApiError> {
        validate_id(&draft.spot_id, "Spot ID")?;
        validate_id(&draft.lot_id, "Lot ID")?;
        let vehicle_number = normalize_vehicle_number(&draft.vehicle_number)?;

        if let Err(err) = BookingWindow::default().check(now, draft.check_in, draft.check_out) {
            tracing::info!(spot_id = %draft.spot_id, reason = %err, "booking rejected locally");
            return Err(err.into());
        }

        let user_id = self.session().require_user_id().await?;
        let check_in = format_timestamp(draft.check_in.to_offset(now.offset()))?;
        let check_out = format_timestamp(draft.check_out.to_offset(now.offset()))?;

        tracing::info!(
            %user_id,
            spot_id = %draft.spot_id,
            lot_id = %draft.lot_id,
            %check_in,
            %check_out,
            "starting booking"
        );

        let path = format!("/api/users/{}/bookings/start", user_id);
        let builder = self.request(Method::POST, &path).await.query(&[
            ("spotId", draft.spot_id.trim()),
            ("lotId", draft.lot_id.trim()),
            ("checkInTime", check_in.as_str()),
            ("checkOutTime", check_out.as_str()),
            ("vehicleNumber", vehicle_number.as_str()),
        ]);
        self.send_json(builder).await
    }

    pub async fn confirm_booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        self.booking_action(booking_id, BookingAction::Confirm, None)
            .await
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> Result<(), ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let path = booking_action_path(&user_id, booking_id, &BookingAction::Cancel);
        let builder = self.request(Method::POST, &path).await;
        self.send_text(builder).await?;
        tracing::info!(%user_id, booking_id, "booking cancelled");
        Ok(())
    }

    pub async fn check_in(&self, booking_id: &str, qr_code: &str) -> Result<Booking, ApiError> {
        let request = CheckInRequest::with_qr_code(qr_code.trim());
        validate_check_in_request(&request)?;
        self.booking_action(booking_id, BookingAction::CheckIn, Some(&request))
            .await
    }

    pub async fn check_out(&self, booking_id: &str, qr_code: &str) -> Result<Booking, ApiError> {
        let request = CheckInRequest::with_qr_code(qr_code.trim());
        validate_check_in_request(&request)?;
        self.booking_action(booking_id, BookingAction::CheckOut, Some(&request))
            .await
    }

    async fn booking_action(
        &self,
        booking_id: &str,
        action: BookingAction,
        body: Option<&CheckInRequest>,
    ) -> Result<Booking, ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let path = booking_action_path(&user_id, booking_id, &action);

        let builder = self.request(Method::POST, &path).await;
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let booking: Booking = self.send_json(builder).await?;

        tracing::info!(%user_id, booking_id, action = action.segment(), status = %booking.status, "booking updated");
        Ok(booking)
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let builder = self
            .request(Method::GET, &booking_path(&user_id, booking_id))
            .await;
        self.send_json(builder).await
    }

    /// Penalty accrued so far, as computed by the backend.
    pub async fn booking_penalty(&self, booking_id: &str) -> Result<f64, ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let path = booking_action_path(&user_id, booking_id, &BookingAction::Penalty);
        let builder = self.request(Method::GET, &path).await;
        self.send_json(builder).await
    }

    pub async fn price_breakup(&self, booking_id: &str) -> Result<PriceBreakup, ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let path = booking_action_path(&user_id, booking_id, &BookingAction::PriceBreakup);
        let builder = self.request(Method::GET, &path).await;
        self.send_json(builder).await
    }

    pub async fn extend_booking(
        &self,
        booking: &Booking,
        new_check_out: OffsetDateTime,
    ) -> Result<Booking, ApiError> {
        self.extend_booking_at(booking, new_check_out, self.lot_now())
            .await
    }

    /// Moves the check-out of `booking` to `new_check_out`. The new interval
    /// must still satisfy the booking window as of `now`.
    pub async fn extend_booking_at(
        &self,
        booking: &Booking,
        new_check_out: OffsetDateTime,
        now: OffsetDateTime,
    ) -> Result<Booking, ApiError> {
        let booking_id = booking.id.as_deref().unwrap_or_default();
        validate_id(booking_id, "Booking ID")?;

        if let Some(current) = booking.check_out_time {
            if new_check_out <= current {
                return Err(ApiError::Validation(
                    "New check-out must be after the current check-out".to_string(),
                ));
            }
        }
        if let Some(check_in) = booking.check_in_time {
            BookingWindow::default().check(now, check_in, new_check_out)?;
        }

        let user_id = self.session().require_user_id().await?;
        let request = ExtendBookingRequest {
            new_check_out_time: format_timestamp(new_check_out.to_offset(now.offset()))?,
        };
        let path = booking_action_path(&user_id, booking_id, &BookingAction::Extend);
        let builder = self.request(Method::PUT, &path).await.json(&request);
        let extended: Booking = self.send_json(builder).await?;

        tracing::info!(%user_id, booking_id, new_check_out = %request.new_check_out_time, "booking extended");
        Ok(extended)
    }

    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        validate_id(booking_id, "Booking ID")?;
        let user_id = self.session().require_user_id().await?;
        let body = BookingStatusUpdate {
            status: status.to_string().to_uppercase(),
        };
        let builder = self
            .request(Method::PUT, &booking_path(&user_id, booking_id))
            .await
            .json(&body);
        self.send_json(builder).await
    }

    /// Operator check-in by plate; the backend finds the matching booking.
    pub async fn operator_check_in(&self, vehicle_number: &str) -> Result<Booking, ApiError> {
        self.operator_action("/api/bookings/checkin", vehicle_number)
            .await
    }

    pub async fn operator_check_out(&self, vehicle_number: &str) -> Result<Booking, ApiError> {
        self.operator_action("/api/bookings/checkout", vehicle_number)
            .await
    }

    async fn operator_action(&self, path: &str, vehicle_number: &str) -> Result<Booking, ApiError> {
        let vehicle_number = normalize_vehicle_number(vehicle_number)?;
        let request = CheckInRequest::with_vehicle_number(&vehicle_number);

        let builder = self.request(Method::POST, path).await.json(&request);
        self.send_json(builder).await.map_err(|err| match err.status() {
            Some(404) => ApiError::NoBookingForVehicle(vehicle_number.clone()),
            _ => err,
        })
    }
}

fn booking_path(user_id: &str, booking_id: &str) -> String {
    format!("/api/users/{}/bookings/{}", user_id, booking_id.trim())
}

fn booking_action_path(user_id: &str, booking_id: &str, action: &BookingAction) -> String {
    format!("{}/{}", booking_path(user_id, booking_id), action.segment())
}
