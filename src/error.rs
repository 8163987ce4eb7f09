use crate::booking_window::BookingWindowError;
use crate::constants::{ERR_EMPTY_RESPONSE, ERR_NOT_LOGGED_IN};
use crate::models::ErrorResponse;

/// Everything a backend call can fail with, as surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Timeouts, refused connections, TLS failures.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `body` is set when the backend sent its standard error JSON.
    #[error("request failed with status {status}")]
    Http {
        status: u16,
        body: Option<ErrorResponse>,
        raw: String,
    },

    #[error("user not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    BookingWindow(#[from] BookingWindowError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("no booking found for vehicle {0}")]
    NoBookingForVehicle(String),

    #[error("empty response from server")]
    EmptyResponse,

    #[error("local storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn storage(err: anyhow::Error) -> Self {
        ApiError::Storage(err.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own message, verbatim, when it sent one.
    pub fn backend_message(&self) -> Option<String> {
        let ApiError::Http { body, raw, .. } = self else {
            return None;
        };
        match body {
            Some(body) => [&body.message, &body.error]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty())
                .cloned(),
            None => Some(raw.trim().to_string()).filter(|m| !m.is_empty()),
        }
    }

    /// Message suitable for a toast or alert.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(err) => format!("Network error: {}", err),
            ApiError::Http { status, .. } => {
                let backend = self.backend_message();
                match status {
                    402 => "Insufficient wallet balance".to_string(),
                    404 => "Not found".to_string(),
                    401 => "Session expired, please log in again".to_string(),
                    403 => "Not authorized".to_string(),
                    409 => backend.unwrap_or_else(|| "Conflict".to_string()),
                    400 => backend.unwrap_or_else(|| "Bad request".to_string()),
                    other => backend.unwrap_or_else(|| format!("Request failed with status {}", other)),
                }
            }
            ApiError::NotLoggedIn => ERR_NOT_LOGGED_IN.to_string(),
            ApiError::BookingWindow(err) => err.to_string(),
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Decode(_) => "Unexpected response from server".to_string(),
            ApiError::NoBookingForVehicle(vehicle) => {
                format!("No active booking found for vehicle: {}", vehicle)
            }
            ApiError::EmptyResponse => ERR_EMPTY_RESPONSE.to_string(),
            ApiError::Storage(_) => "Could not update the local session".to_string(),
        }
    }
}
