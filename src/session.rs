use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::constants::*;
use crate::database::PreferenceStore;
use crate::error::ApiError;
use crate::models::AuthResponse;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub auth_token: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub role: String,
    /// Unix seconds at which the token was stored.
    pub issued_at: i64,
}

impl Session {
    pub fn from_auth(auth: &AuthResponse, now: OffsetDateTime) -> Self {
        Self {
            user_id: auth.id.clone(),
            auth_token: auth.token.clone(),
            user_name: auth.name.clone(),
            role: auth.role.clone(),
            issued_at: now.unix_timestamp(),
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp().saturating_sub(self.issued_at)
            >= Duration::hours(SESSION_EXPIRY_HOURS).whole_seconds()
    }

    pub fn is_operator(&self) -> bool {
        self.role.eq_ignore_ascii_case("OPERATOR") || self.role.eq_ignore_ascii_case("ADMIN")
    }
}

/// The logged-in user, shared by everything that talks to the backend.
///
/// Created explicitly with [`SessionContext::init`] (persisted) or
/// [`SessionContext::detached`] (memory only) and handed to the API client;
/// there is no global session.
#[derive(Clone)]
pub struct SessionContext {
    store: Option<PreferenceStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub async fn init(store: PreferenceStore) -> anyhow::Result<Self> {
        let persisted = match store.get(SESSION_KEY).await? {
            Some(raw) => serde_json::from_str::<Session>(&raw).ok(),
            None => None,
        };

        let current = match persisted {
            Some(session) if session.is_expired(OffsetDateTime::now_utc()) => {
                tracing::info!(user_id = %session.user_id, "stored session expired, clearing");
                store.remove(SESSION_KEY).await?;
                None
            }
            other => other,
        };

        if let Some(session) = &current {
            tracing::debug!(user_id = %session.user_id, "restored session");
        }

        Ok(Self {
            store: Some(store),
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub fn detached() -> Self {
        Self {
            store: None,
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn set(&self, session: Session) -> anyhow::Result<()> {
        if let Some(store) = &self.store {
            store
                .set(SESSION_KEY, &serde_json::to_string(&session)?)
                .await?;
        }
        tracing::info!(user_id = %session.user_id, "session started");
        *self.current.write().await = Some(session);
        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        if let Some(store) = &self.store {
            store.remove(SESSION_KEY).await?;
        }
        if let Some(previous) = self.current.write().await.take() {
            tracing::info!(user_id = %previous.user_id, "session cleared");
        }
        Ok(())
    }

    pub async fn require_user_id(&self) -> Result<String, ApiError> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or(ApiError::NotLoggedIn)
    }

    /// Token to attach as a bearer credential, if it has not expired.
    pub async fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|s| !s.is_expired(OffsetDateTime::now_utc()))
            .map(|s| s.auth_token.clone())
    }
}
