use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    PaymentCallbackRequest, PaymentCallbackResponse, PaymentInitiateRequest,
    PaymentInitiateResponse,
};
use crate::utils::{validate_amount, validate_string_length};

impl ApiClient {
    /// Opens a gateway order for a wallet top-up.
    pub async fn initiate_payment(&self, amount: f64) -> Result<PaymentInitiateResponse, ApiError> {
        validate_amount(amount)?;
        let user_id = self.session().require_user_id().await?;
        let builder = self
            .request(Method::POST, "/api/payments/initiate")
            .await
            .json(&PaymentInitiateRequest { user_id, amount });
        self.send_json(builder).await
    }

    /// Reports the gateway's verdict back to the backend.
    pub async fn payment_callback(
        &self,
        request: &PaymentCallbackRequest,
    ) -> Result<PaymentCallbackResponse, ApiError> {
        validate_string_length(&request.order_id, "Order ID", 128)?;
        validate_string_length(&request.payment_id, "Payment ID", 128)?;
        let builder = self
            .request(Method::POST, "/api/payments/callback")
            .await
            .json(request);
        self.send_json(builder).await
    }

    pub async fn generate_otp(&self, key: &str) -> Result<String, ApiError> {
        validate_string_length(key, "Phone number", 20)?;
        let builder = self
            .request(Method::POST, "/api/otp/generate")
            .await
            .query(&[("key", key.trim())]);
        let text = self.send_text(builder).await?;

        // Some deployments return a JSON string, others plain text.
        Ok(serde_json::from_str::<String>(&text).unwrap_or_else(|_| text.trim().to_string()))
    }

    pub async fn validate_otp(&self, key: &str, otp: &str) -> Result<bool, ApiError> {
        validate_string_length(key, "Phone number", 20)?;
        validate_string_length(otp, "OTP", 10)?;
        let builder = self
            .request(Method::PUT, "/api/otp/validate")
            .await
            .query(&[("key", key.trim()), ("otp", otp.trim())]);
        self.send_json(builder).await
    }
}
