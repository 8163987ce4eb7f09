use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use time::OffsetDateTime;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "ACTIVE")]
    Active,
    #[serde(alias = "COMPLETED")]
    Completed,
    #[serde(alias = "CANCELLED")]
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub lot_id: String,
    pub spot_id: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in_time: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out_time: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
}

/// A parking spot as normalized by [`crate::spots::decode_spot`].
///
/// Deserialization always goes through the lenient decoder, so legacy payloads
/// (`_id`, boolean `available`, missing `status`) decode into the same shape.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSpot {
    pub id: String,
    pub lot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_name: Option<String>,
    #[serde(rename = "spotId", skip_serializing_if = "Option::is_none")]
    pub spot_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    pub capacity: i64,
    pub available: i64,
    pub status: String,
}

impl ParkingSpot {
    /// Display label: spot name, then zone name, then the raw id.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.zone_name.as_deref())
            .unwrap_or(&self.id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub total_spots: i64,
    #[serde(default)]
    pub available_spots: i64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Credit,
    Debit,
    Other(String),
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CREDIT" => TransactionType::Credit,
            "DEBIT" => TransactionType::Debit,
            _ => TransactionType::Other(value),
        }
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Credit => "CREDIT".to_string(),
            TransactionType::Debit => "DEBIT".to_string(),
            TransactionType::Other(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_after: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WalletDetails {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<WalletTransaction>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub vehicle_numbers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_vehicle: Option<String>,
    #[serde(default)]
    pub wallet_coins: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_lot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_lot_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_lot_name: Option<String>,
    #[serde(default)]
    pub vehicle_numbers: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInMode {
    QrCode,
    VehicleNumber,
    Pin,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub mode: CheckInMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}

impl CheckInRequest {
    pub fn with_qr_code(qr_code: &str) -> Self {
        Self {
            mode: CheckInMode::QrCode,
            qr_code: Some(qr_code.to_string()),
            vehicle_number: None,
            pin: None,
        }
    }

    pub fn with_vehicle_number(vehicle_number: &str) -> Self {
        Self {
            mode: CheckInMode::VehicleNumber,
            qr_code: None,
            vehicle_number: Some(vehicle_number.to_string()),
            pin: None,
        }
    }

    pub fn with_pin(pin: &str) -> Self {
        Self {
            mode: CheckInMode::Pin,
            qr_code: None,
            vehicle_number: None,
            pin: Some(pin.to_string()),
        }
    }

    /// The credential that `mode` says must be present.
    pub fn credential(&self) -> Option<&str> {
        match self.mode {
            CheckInMode::QrCode => self.qr_code.as_deref(),
            CheckInMode::VehicleNumber => self.vehicle_number.as_deref(),
            CheckInMode::Pin => self.pin.as_deref(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateRequest {
    pub user_id: String,
    pub amount: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiateResponse {
    pub order_id: String,
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCallbackRequest {
    pub order_id: String,
    pub payment_id: String,
    pub success: bool,
    pub user_id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentCallbackResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExtendBookingRequest {
    pub new_check_out_time: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct BookingStatusUpdate {
    pub status: String,
}

/// Line items of a booking's charge, keyed by the backend's labels.
pub type PriceBreakup = std::collections::BTreeMap<String, serde_json::Value>;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TopUpRequest {
    pub amount: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TopUpResponse {
    #[serde(default)]
    pub balance: Option<f64>,
}

/// Standard error body returned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub validation_errors: Option<HashMap<String, String>>,
}

// Console payloads

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookingWindowPayload {
    #[serde(with = "time::serde::rfc3339")]
    pub check_in_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub check_out_time: OffsetDateTime,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct EligibilityResponse {
    pub allowed: bool,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuoteResponse {
    pub allowed: bool,
    pub message: Option<String>,
    pub hours: i64,
    pub amount: f64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub spot_id: String,
    pub lot_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub check_out_time: OffsetDateTime,
    pub vehicle_number: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub qr_code: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub vehicle_number: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionsQuery {
    pub max_items: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub role: String,
}
