use reqwest::Method;
use time::OffsetDateTime;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{TopUpRequest, TopUpResponse, WalletDetails, WalletTransaction};
use crate::transactions::{TransactionListItem, group_transactions};
use crate::utils::{validate_amount, validate_max_items};

impl ApiClient {
    pub async fn wallet(&self) -> Result<WalletDetails, ApiError> {
        let user_id = self.session().require_user_id().await?;
        let path = format!("/api/users/{}/wallet", user_id);
        let builder = self.request(Method::GET, &path).await;
        self.send_json(builder).await
    }

    pub async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>, ApiError> {
        let user_id = self.session().require_user_id().await?;
        let path = format!("/api/users/{}/wallet/transactions", user_id);
        let builder = self.request(Method::GET, &path).await;
        let transactions: Option<Vec<WalletTransaction>> = self.send_json(builder).await?;
        Ok(transactions.unwrap_or_default())
    }

    /// Transactions bucketed for display, relative to `now`.
    pub async fn grouped_transactions(
        &self,
        now: OffsetDateTime,
        max_items: Option<usize>,
    ) -> Result<Vec<TransactionListItem>, ApiError> {
        let max_items = validate_max_items(max_items)?;
        let transactions = self.wallet_transactions().await?;
        Ok(group_transactions(&transactions, now, max_items))
    }

    pub async fn top_up(&self, amount: f64) -> Result<TopUpResponse, ApiError> {
        validate_amount(amount)?;
        let user_id = self.session().require_user_id().await?;
        let path = format!("/api/users/{}/wallet/topup", user_id);
        let builder = self
            .request(Method::POST, &path)
            .await
            .json(&TopUpRequest { amount });
        let response: TopUpResponse = self.send_json(builder).await?;

        tracing::info!(%user_id, amount, balance = ?response.balance, "wallet topped up");
        Ok(response)
    }
}
