use reqwest::Method;
use time::OffsetDateTime;

use crate::client::ApiClient;
use crate::constants::*;
use crate::error::ApiError;
use crate::models::{AuthRequest, AuthResponse, PublicUser, UserProfile, UserRegistration};
use crate::session::Session;
use crate::utils::validate_string_length;

fn validate_email(email: &str) -> Result<(), ApiError> {
    validate_string_length(email, "Email", MAX_EMAIL_LENGTH)?;
    if !email.contains('@') {
        return Err(ApiError::Validation("Email address is not valid".to_string()));
    }
    Ok(())
}

pub fn validate_registration(registration: &UserRegistration) -> Result<(), ApiError> {
    validate_string_length(&registration.name, "Name", MAX_NAME_LENGTH)?;
    validate_email(&registration.email)?;
    if registration.phone.trim().is_empty() {
        return Err(ApiError::Validation("Phone cannot be empty".to_string()));
    }
    if !registration
        .phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == ' ' || c == '-')
    {
        return Err(ApiError::Validation(
            "Phone can only contain digits, spaces, hyphens and a leading +".to_string(),
        ));
    }
    if registration.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, ApiError> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(ApiError::Validation("Password cannot be empty".to_string()));
        }

        let builder = self
            .request(Method::POST, "/api/auth/login")
            .await
            .json(&AuthRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            });
        let auth: AuthResponse = self.send_json(builder).await?;

        self.start_session(&auth).await
    }

    pub async fn register(&self, registration: &UserRegistration) -> Result<PublicUser, ApiError> {
        validate_registration(registration)?;

        let builder = self
            .request(Method::POST, "/api/users/register")
            .await
            .json(registration);
        let auth: AuthResponse = self.send_json(builder).await?;

        self.start_session(&auth).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().clear().await.map_err(ApiError::storage)
    }

    pub async fn user_profile(&self) -> Result<UserProfile, ApiError> {
        let user_id = self.session().require_user_id().await?;
        let builder = self
            .request(Method::GET, &format!("/api/users/{}", user_id))
            .await;
        self.send_json(builder).await
    }

    pub async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        validate_string_length(&profile.name, "Name", MAX_NAME_LENGTH)?;
        validate_email(&profile.email)?;
        let user_id = self.session().require_user_id().await?;
        if profile.id.as_deref().is_some_and(|id| id != user_id) {
            return Err(ApiError::Validation(
                "Profile belongs to a different user".to_string(),
            ));
        }

        let builder = self
            .request(Method::PUT, &format!("/api/users/{}", user_id))
            .await
            .json(profile);
        let updated: UserProfile = self.send_json(builder).await?;

        tracing::info!(%user_id, "profile updated");
        Ok(updated)
    }

    async fn start_session(&self, auth: &AuthResponse) -> Result<PublicUser, ApiError> {
        if auth.token.trim().is_empty() || auth.id.trim().is_empty() {
            return Err(ApiError::EmptyResponse);
        }

        self.session()
            .set(Session::from_auth(auth, OffsetDateTime::now_utc()))
            .await
            .map_err(ApiError::storage)?;

        Ok(PublicUser {
            id: auth.id.clone(),
            name: auth.name.clone(),
            role: auth.role.clone(),
        })
    }
}
