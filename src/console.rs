use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};

use crate::booking_window::BookingWindow;
use crate::bookings::BookingDraft;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    AuthRequest, Booking, BookingWindowPayload, CreateBookingPayload, EligibilityResponse,
    GetTransactionsQuery, ParkingLot, ParkingSpot, PublicUser, QrPayload, QuoteResponse,
    VehiclePayload,
};
use crate::pricing;
use crate::transactions::TransactionListItem;

type ConsoleResult<T> = Result<(StatusCode, Json<T>), (StatusCode, String)>;

pub fn router(client: ApiClient) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/console/login", post(login))
        .route("/console/logout", post(logout))
        .route("/console/lots", get(list_lots))
        .route("/console/lots/{lot_id}/spots", get(list_spots))
        .route("/console/bookings", get(list_bookings).post(create_booking))
        .route("/console/bookings/{booking_id}/cancel", post(cancel_booking))
        .route("/console/bookings/{booking_id}/checkin", post(check_in))
        .route("/console/bookings/{booking_id}/checkout", post(check_out))
        .route("/console/wallet/transactions", get(get_transactions))
        .route("/console/operator/checkin", post(operator_check_in))
        .route("/console/operator/checkout", post(operator_check_out))
        .route("/console/eligibility", post(eligibility))
        .route("/console/quote", post(quote))
        .with_state(client)
}

/// Maps a client error onto the console's HTTP status plus the user-facing message.
pub fn console_error(err: ApiError) -> (StatusCode, String) {
    let status = match &err {
        ApiError::Http { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ApiError::Network(_) | ApiError::Decode(_) | ApiError::EmptyResponse => {
            StatusCode::BAD_GATEWAY
        }
        ApiError::NotLoggedIn => StatusCode::UNAUTHORIZED,
        ApiError::BookingWindow(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
        ApiError::NoBookingForVehicle(_) => StatusCode::NOT_FOUND,
        ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.user_message())
}

async fn root(State(client): State<ApiClient>) -> Html<String> {
    let user = match client.session().current().await {
        Some(session) => format!("Logged in as {} ({})", session.user_name, session.user_id),
        None => "Not logged in".to_string(),
    };
    Html(format!(
        "<h1>Gridee console</h1><p>Backend: {}</p><p>{}</p>",
        client.base_url(),
        user
    ))
}

async fn login(
    State(client): State<ApiClient>,
    Json(payload): Json<AuthRequest>,
) -> ConsoleResult<PublicUser> {
    let user = client
        .login(&payload.email, &payload.password)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(user)))
}

async fn logout(State(client): State<ApiClient>) -> Result<StatusCode, (StatusCode, String)> {
    client.logout().await.map_err(console_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_lots(State(client): State<ApiClient>) -> ConsoleResult<Vec<ParkingLot>> {
    let lots = client.parking_lots().await.map_err(console_error)?;
    Ok((StatusCode::OK, Json(lots)))
}

async fn list_spots(
    State(client): State<ApiClient>,
    Path(lot_id): Path<String>,
) -> ConsoleResult<Vec<ParkingSpot>> {
    let spots = client.spots_for_lot(&lot_id).await.map_err(console_error)?;
    Ok((StatusCode::OK, Json(spots)))
}

async fn list_bookings(State(client): State<ApiClient>) -> ConsoleResult<Vec<Booking>> {
    let bookings = client.bookings().await.map_err(console_error)?;
    Ok((StatusCode::OK, Json(bookings)))
}

async fn create_booking(
    State(client): State<ApiClient>,
    Json(payload): Json<CreateBookingPayload>,
) -> ConsoleResult<Booking> {
    let draft = BookingDraft {
        spot_id: payload.spot_id,
        lot_id: payload.lot_id,
        check_in: payload.check_in_time,
        check_out: payload.check_out_time,
        vehicle_number: payload.vehicle_number,
    };
    let booking = client.start_booking(&draft).await.map_err(console_error)?;
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn cancel_booking(
    State(client): State<ApiClient>,
    Path(booking_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    client
        .cancel_booking(&booking_id)
        .await
        .map_err(console_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn check_in(
    State(client): State<ApiClient>,
    Path(booking_id): Path<String>,
    Json(payload): Json<QrPayload>,
) -> ConsoleResult<Booking> {
    let booking = client
        .check_in(&booking_id, &payload.qr_code)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(booking)))
}

async fn check_out(
    State(client): State<ApiClient>,
    Path(booking_id): Path<String>,
    Json(payload): Json<QrPayload>,
) -> ConsoleResult<Booking> {
    let booking = client
        .check_out(&booking_id, &payload.qr_code)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(booking)))
}

async fn get_transactions(
    State(client): State<ApiClient>,
    Query(query): Query<GetTransactionsQuery>,
) -> ConsoleResult<Vec<TransactionListItem>> {
    let items = client
        .grouped_transactions(client.lot_now(), query.max_items)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(items)))
}

async fn operator_check_in(
    State(client): State<ApiClient>,
    Json(payload): Json<VehiclePayload>,
) -> ConsoleResult<Booking> {
    let booking = client
        .operator_check_in(&payload.vehicle_number)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(booking)))
}

async fn operator_check_out(
    State(client): State<ApiClient>,
    Json(payload): Json<VehiclePayload>,
) -> ConsoleResult<Booking> {
    let booking = client
        .operator_check_out(&payload.vehicle_number)
        .await
        .map_err(console_error)?;
    Ok((StatusCode::OK, Json(booking)))
}

// Eligibility and quotes are answered locally, without a backend round-trip.

async fn eligibility(
    State(client): State<ApiClient>,
    Json(payload): Json<BookingWindowPayload>,
) -> ConsoleResult<EligibilityResponse> {
    let verdict = BookingWindow::default().check(
        client.lot_now(),
        payload.check_in_time,
        payload.check_out_time,
    );
    Ok((
        StatusCode::OK,
        Json(EligibilityResponse {
            allowed: verdict.is_ok(),
            message: verdict.err().map(|e| e.to_string()),
        }),
    ))
}

async fn quote(
    State(client): State<ApiClient>,
    Json(payload): Json<BookingWindowPayload>,
) -> ConsoleResult<QuoteResponse> {
    let hourly_rate = payload.hourly_rate.unwrap_or(0.0);
    if !hourly_rate.is_finite() || hourly_rate < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Hourly rate cannot be negative".to_string(),
        ));
    }

    let verdict = BookingWindow::default().check(
        client.lot_now(),
        payload.check_in_time,
        payload.check_out_time,
    );
    let quote = pricing::quote(payload.check_in_time, payload.check_out_time, hourly_rate);

    Ok((
        StatusCode::OK,
        Json(QuoteResponse {
            allowed: verdict.is_ok(),
            message: verdict.err().map(|e| e.to_string()),
            hours: quote.hours,
            amount: quote.amount,
        }),
    ))
}
