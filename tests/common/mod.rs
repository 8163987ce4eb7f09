#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;
use time::OffsetDateTime;
use time::macros::datetime;

use gridee_client::client::ApiClient;
use gridee_client::config::Config;
use gridee_client::database::PreferenceStore;
use gridee_client::models::WalletTransaction;
use gridee_client::session::SessionContext;

pub const TEST_EMAIL: &str = "driver@example.com";
pub const TEST_PASSWORD: &str = "secret-password";
pub const TEST_USER_ID: &str = "user-1";
pub const TEST_TOKEN: &str = "test-token";

/// 14:00 in a +05:30 lot, well before the 20:00 cutoff.
pub fn afternoon() -> OffsetDateTime {
    datetime!(2024-06-10 14:00 +05:30)
}

/// 21:30 in a +05:30 lot, after the cutoff.
pub fn evening() -> OffsetDateTime {
    datetime!(2024-06-10 21:30 +05:30)
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Highest number of requests the backend was handling at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn record(State(backend): State<MockBackend>, req: Request, next: Next) -> Response {
    let seen = {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        SeenRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            authorization: header("authorization"),
            request_id: header("x-request-id"),
        }
    };
    backend.seen.lock().unwrap().push(seen);

    let current = backend.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    backend.max_in_flight.fetch_max(current, Ordering::SeqCst);
    let response = next.run(req).await;
    backend.in_flight.fetch_sub(1, Ordering::SeqCst);
    response
}

fn error_body(status: u16, message: &str) -> Value {
    json!({
        "timestamp": "2024-06-10T08:30:00Z",
        "status": status,
        "error": "Error",
        "message": message,
        "path": "/api"
    })
}

pub fn sample_booking(status: &str) -> Value {
    json!({
        "id": "booking-1",
        "userId": TEST_USER_ID,
        "lotId": "lot-1",
        "spotId": "spot-1",
        "status": status,
        "amount": 60.0,
        "qrCode": "QR-booking-1",
        "checkInTime": "2024-06-10T15:00:00+05:30",
        "checkOutTime": "2024-06-10T17:00:00+05:30",
        "vehicleNumber": "KA01AB1234"
    })
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        (
            StatusCode::OK,
            Json(json!({
                "token": TEST_TOKEN,
                "id": TEST_USER_ID,
                "name": "Test Driver",
                "role": "USER"
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(error_body(401, "Invalid credentials")),
        )
    }
}

async fn generate_otp() -> (StatusCode, String) {
    (StatusCode::OK, "\"123456\"".to_string())
}

async fn validate_otp() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!(true)))
}

async fn parking_lots() -> Json<Value> {
    // Slow enough that overlapping requests would be observed.
    tokio::time::sleep(Duration::from_millis(25)).await;
    Json(json!([
        { "id": "lot-1", "name": "Central", "totalSpots": 40, "availableSpots": 12 }
    ]))
}

async fn lot_spots(Path(lot_id): Path<String>) -> Json<Value> {
    Json(json!([
        { "_id": "legacy-1", "lotId": lot_id, "available": true, "capacity": 4 },
        { "spotId": "S-2", "lotId": lot_id, "available": 0, "zoneName": "Basement" },
        { "id": "spot-3", "lotId": lot_id, "available": 3, "status": "maintenance", "name": "Level 1" }
    ]))
}

async fn available_spots() -> Json<Value> {
    Json(json!([
        { "_id": "free-1", "lotId": "lot-1", "available": true, "status": null }
    ]))
}

async fn booking_detail() -> Json<Value> {
    Json(sample_booking("ACTIVE"))
}

async fn update_booking_status(Json(body): Json<Value>) -> Json<Value> {
    let status = body["status"].as_str().unwrap_or("pending").to_string();
    Json(sample_booking(&status))
}

async fn booking_penalty() -> Json<Value> {
    Json(json!(12.5))
}

async fn price_breakup() -> Json<Value> {
    Json(json!({ "baseFare": 60.0, "penalty": 12.5, "total": 72.5 }))
}

async fn extend_booking(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut booking = sample_booking("ACTIVE");
    booking["checkOutTime"] = body["newCheckOutTime"].clone();
    (StatusCode::OK, Json(booking))
}

pub fn sample_profile() -> Value {
    json!({
        "id": TEST_USER_ID,
        "name": "Test Driver",
        "email": TEST_EMAIL,
        "phone": "+919800000000",
        "vehicleNumbers": ["KA01AB1234"],
        "walletCoins": 40,
        "role": "USER"
    })
}

async fn user_profile() -> Json<Value> {
    Json(sample_profile())
}

async fn update_profile(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn all_bookings() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(error_body(404, "No bookings for user")),
    )
}

async fn start_booking() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(sample_booking("pending")))
}

async fn cancel_booking() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CONFLICT,
        Json(error_body(409, "Booking already checked in")),
    )
}

async fn booking_check_in() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(error_body(400, "QR code does not match booking")),
    )
}

async fn booking_check_out() -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, String::new())
}

async fn operator_check_in() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(error_body(404, "Booking not found")),
    )
}

async fn operator_check_out() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(sample_booking("COMPLETED")))
}

async fn top_up() -> (StatusCode, Json<Value>) {
    (
        StatusCode::PAYMENT_REQUIRED,
        Json(error_body(402, "Wallet balance too low")),
    )
}

async fn wallet() -> Json<Value> {
    Json(json!({ "balance": 250.0, "transactions": [] }))
}

async fn wallet_transactions() -> Json<Value> {
    Json(json!([
        { "id": "t1", "type": "DEBIT", "amount": 40.0, "timestamp": "2024-06-10T09:00:00+05:30" },
        { "id": "t2", "type": "CREDIT", "amount": 500.0, "timestamp": "2024-06-07T09:00:00+05:30" },
        { "id": "t3", "type": "REFUND", "amount": 20.0, "timestamp": "2024-05-01T09:00:00+05:30" }
    ]))
}

/// Spawns a fake backend on an ephemeral port and returns its base URL.
pub async fn spawn_backend() -> (String, MockBackend) {
    let backend = MockBackend::default();

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/otp/generate", post(generate_otp))
        .route("/api/otp/validate", put(validate_otp))
        .route("/api/parking-lots", get(parking_lots))
        .route("/api/parking-spots/lot/{lot_id}", get(lot_spots))
        .route("/api/parking-spots/available", post(available_spots))
        .route("/api/users/{user_id}", get(user_profile).put(update_profile))
        .route("/api/users/{user_id}/all-bookings", get(all_bookings))
        .route("/api/users/{user_id}/bookings/start", post(start_booking))
        .route(
            "/api/users/{user_id}/bookings/{booking_id}",
            get(booking_detail).put(update_booking_status),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/penalty",
            get(booking_penalty),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/priceBreakup",
            get(price_breakup),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/extend",
            put(extend_booking),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/cancel",
            post(cancel_booking),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/checkin",
            post(booking_check_in),
        )
        .route(
            "/api/users/{user_id}/bookings/{booking_id}/checkout",
            post(booking_check_out),
        )
        .route("/api/bookings/checkin", post(operator_check_in))
        .route("/api/bookings/checkout", post(operator_check_out))
        .route("/api/users/{user_id}/wallet", get(wallet))
        .route("/api/users/{user_id}/wallet/topup", post(top_up))
        .route(
            "/api/users/{user_id}/wallet/transactions",
            get(wallet_transactions),
        )
        .layer(middleware::from_fn_with_state(backend.clone(), record));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });

    (format!("http://{}", addr), backend)
}

pub fn test_client(base_url: &str) -> ApiClient {
    let config = Config::new(base_url);
    ApiClient::new(&config, SessionContext::detached()).expect("Failed to build client")
}

pub async fn logged_in_client(base_url: &str) -> ApiClient {
    let client = test_client(base_url);
    client
        .login(TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap_or_else(|e| panic!("Login against mock backend failed: {}", e));
    client
}

/// Opens a preference store in a fresh directory. The returned guard must outlive the store.
pub async fn temp_store() -> (PreferenceStore, tempfile::TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();
    let store = PreferenceStore::open(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to open preference store at {}: {}", data_path, e));
    (store, temp_dir)
}

pub fn transaction(id: &str, kind: &str, timestamp: OffsetDateTime) -> WalletTransaction {
    WalletTransaction {
        id: Some(id.to_string()),
        kind: kind.to_string().into(),
        status: None,
        amount: 10.0,
        description: None,
        timestamp,
        balance_after: None,
    }
}
