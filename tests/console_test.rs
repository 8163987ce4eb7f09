mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use common::*;
use gridee_client::console::{console_error, router};
use gridee_client::error::ApiError;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn offline_app() -> Router {
    router(test_client("http://127.0.0.1:1"))
}

#[tokio::test]
async fn test_root_reports_backend_and_login_state() {
    let (status, body) = call(offline_app(), "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http://127.0.0.1:1"));
    assert!(body.contains("Not logged in"));
}

#[tokio::test]
async fn test_eligibility_rejects_inverted_range() {
    let (status, body) = call(
        offline_app(),
        "POST",
        "/console/eligibility",
        Some(json!({
            "checkInTime": "2030-01-01T12:00:00Z",
            "checkOutTime": "2030-01-01T11:00:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["allowed"], false);
    assert_eq!(
        body["message"],
        "Invalid time range: check-out must be after check-in"
    );
}

#[tokio::test]
async fn test_quote_rounds_partial_hours() {
    let (status, body) = call(
        offline_app(),
        "POST",
        "/console/quote",
        Some(json!({
            "checkInTime": "2030-01-01T10:00:00+05:30",
            "checkOutTime": "2030-01-01T12:30:00+05:30",
            "hourlyRate": 30.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["hours"], 3);
    assert_eq!(body["amount"], 90.0);
}

#[tokio::test]
async fn test_quote_rejects_negative_rate() {
    let (status, body) = call(
        offline_app(),
        "POST",
        "/console/quote",
        Some(json!({
            "checkInTime": "2030-01-01T10:00:00Z",
            "checkOutTime": "2030-01-01T11:00:00Z",
            "hourlyRate": -5.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Hourly rate cannot be negative");
}

#[tokio::test]
async fn test_create_booking_with_invalid_range_is_bad_request() {
    let (status, body) = call(
        offline_app(),
        "POST",
        "/console/bookings",
        Some(json!({
            "spotId": "spot-1",
            "lotId": "lot-1",
            "checkInTime": "2030-01-01T12:00:00Z",
            "checkOutTime": "2030-01-01T12:00:00Z",
            "vehicleNumber": "KA01AB1234"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid time range: check-out must be after check-in");
}

#[tokio::test]
async fn test_user_endpoints_require_login() {
    let (status, body) = call(offline_app(), "GET", "/console/bookings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "User not logged in");
}

#[tokio::test]
async fn test_login_then_list_lots_through_console() {
    let (base_url, backend) = spawn_backend().await;
    let app = router(test_client(&base_url));

    let (status, body) = call(
        app.clone(),
        "POST",
        "/console/login",
        Some(json!({ "email": TEST_EMAIL, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["id"], TEST_USER_ID);

    let (status, body) = call(app.clone(), "GET", "/console/lots", None).await;
    assert_eq!(status, StatusCode::OK);
    let lots: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(lots[0]["name"], "Central");

    let (status, body) = call(
        app.clone(),
        "GET",
        "/console/wallet/transactions?maxItems=1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(items.as_array().map(Vec::len), Some(2));

    let (status, _) = call(app, "POST", "/console/logout", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        backend.requests_to("/api/parking-lots")[0]
            .authorization
            .as_deref(),
        Some("Bearer test-token")
    );
}

#[tokio::test]
async fn test_backend_errors_pass_status_through() {
    let (base_url, _backend) = spawn_backend().await;
    let app = router(logged_in_client(&base_url).await);

    let (status, body) = call(
        app.clone(),
        "POST",
        "/console/operator/checkin",
        Some(json!({ "vehicleNumber": "ka01ab1234" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "No active booking found for vehicle: KA01AB1234");

    let (status, body) = call(app, "POST", "/console/bookings/booking-1/cancel", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, "Booking already checked in");
}

#[test]
fn test_console_error_statuses() {
    assert_eq!(
        console_error(ApiError::EmptyResponse).0,
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        console_error(ApiError::Validation("Amount must be greater than zero".to_string())),
        (
            StatusCode::BAD_REQUEST,
            "Amount must be greater than zero".to_string()
        )
    );
    assert_eq!(
        console_error(ApiError::Storage("disk full".to_string())).0,
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        console_error(ApiError::Http {
            status: 402,
            body: None,
            raw: String::new(),
        }),
        (
            StatusCode::PAYMENT_REQUIRED,
            "Insufficient wallet balance".to_string()
        )
    );
}
