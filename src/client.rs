use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::constants::{PUBLIC_PATHS, REQUEST_ID_HEADER};
use crate::error::ApiError;
use crate::models::ErrorResponse;
use crate::session::SessionContext;

/// Typed client for the parking backend.
///
/// Endpoint methods live next to their resource (`auth.rs`, `bookings.rs`,
/// `wallet.rs`, ...). Requests issued through one client (and its clones) are
/// serialized: the next call starts only after the previous one has finished.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    lot_offset: UtcOffset,
    session: SessionContext,
    in_flight: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.http_timeout)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            lot_offset: config.lot_offset,
            session,
            in_flight: Arc::new(Mutex::new(())),
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wall-clock time in the lot's offset, the reference for booking windows.
    pub fn lot_now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.lot_offset)
    }

    pub(crate) async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        if !requires_auth(path) {
            return builder;
        }
        match self.session.bearer_token().await {
            Some(token) => builder.bearer_auth(token),
            None => {
                tracing::debug!(path, "no valid token for authenticated path");
                builder
            }
        }
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.send(builder).await?;
        if text.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub(crate) async fn send_text(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        self.send(builder).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let _guard = self.in_flight.lock().await;

        let request_id = Uuid::new_v4().to_string();
        let request = builder
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::debug!(%request_id, %method, %path, "sending request");

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%request_id, %method, %path, error = %e, "request failed");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            tracing::debug!(%request_id, status = status.as_u16(), "request succeeded");
            return Ok(text);
        }

        tracing::warn!(
            %request_id,
            %method,
            %path,
            status = status.as_u16(),
            body = %text,
            "backend returned an error"
        );
        Err(ApiError::Http {
            status: status.as_u16(),
            body: serde_json::from_str::<ErrorResponse>(&text).ok(),
            raw: text,
        })
    }
}

/// Every path outside the public allow-list carries the bearer token.
/// Public entries match whole path segments, so `/api/users/login-x` is private.
pub fn requires_auth(path: &str) -> bool {
    !PUBLIC_PATHS.iter().any(|public| {
        path.strip_prefix(public)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}
