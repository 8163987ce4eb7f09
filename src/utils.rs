use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::constants::*;
use crate::error::ApiError;
use crate::models::{CheckInMode, CheckInRequest};

pub fn validate_string_length(
    value: &str,
    field_name: &str,
    max_length: usize,
) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field_name)));
    }
    if value.len() > max_length {
        return Err(ApiError::Validation(format!(
            "{} must be less than {} characters",
            field_name, max_length
        )));
    }
    Ok(())
}

pub fn validate_id(value: &str, field_name: &str) -> Result<(), ApiError> {
    validate_string_length(value, field_name, MAX_ID_LENGTH)?;
    if value.contains('/') {
        return Err(ApiError::Validation(format!("{} contains invalid characters", field_name)));
    }
    Ok(())
}

pub fn validate_max_items(max_items: Option<usize>) -> Result<Option<usize>, ApiError> {
    match max_items {
        Some(0) => Err(ApiError::Validation("Max items must be greater than 0".to_string())),
        Some(n) if n > MAX_TRANSACTION_ITEMS => Err(ApiError::Validation(format!(
            "Max items cannot exceed {}",
            MAX_TRANSACTION_ITEMS
        ))),
        other => Ok(other),
    }
}

pub fn validate_amount(amount: f64) -> Result<(), ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::Validation("Amount must be greater than zero".to_string()));
    }
    Ok(())
}

/// Operators type plates in any case and with stray spaces; the backend stores them upper-cased.
pub fn normalize_vehicle_number(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("Vehicle number cannot be empty".to_string()));
    }
    if trimmed.len() > MAX_VEHICLE_NUMBER_LENGTH {
        return Err(ApiError::Validation(format!(
            "Vehicle number must be less than {} characters",
            MAX_VEHICLE_NUMBER_LENGTH
        )));
    }
    Ok(trimmed.to_uppercase())
}

pub fn validate_check_in_request(request: &CheckInRequest) -> Result<(), ApiError> {
    let present = request
        .credential()
        .is_some_and(|value| !value.trim().is_empty());
    if present {
        if let Some(qr_code) = request.qr_code.as_deref() {
            validate_string_length(qr_code, "QR code", MAX_QR_CODE_LENGTH)?;
        }
        return Ok(());
    }

    let message = match request.mode {
        CheckInMode::QrCode => "QR code is required when mode is QR_CODE",
        CheckInMode::VehicleNumber => "Vehicle number is required when mode is VEHICLE_NUMBER",
        CheckInMode::Pin => "PIN is required when mode is PIN",
    };
    Err(ApiError::Validation(message.to_string()))
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| ApiError::Validation(format!("Invalid timestamp: {}", e)))
}
