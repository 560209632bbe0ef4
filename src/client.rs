use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::dto::account::AccountApiResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to account service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("account service answered with status {0}")]
    UnexpectedStatus(u16),
}

// Outbound port to the account service
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// `Ok(None)` when the account service does not know the account.
    async fn fetch_account(&self, account_id: Uuid) -> Result<Option<AccountApiResponse>, ClientError>;
}

pub struct HttpAccountClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAccountClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn account_url(&self, account_id: Uuid) -> String {
        format!("{}/accounts/{}", self.base_url, account_id)
    }
}

#[async_trait]
impl AccountClient for HttpAccountClient {
    async fn fetch_account(&self, account_id: Uuid) -> Result<Option<AccountApiResponse>, ClientError> {
        let url = self.account_url(account_id);
        tracing::debug!("Fetching account from {url}");

        let response = self.http.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::info!("Account service does not know account: {account_id}");
                Ok(None)
            }
            status if status.is_success() => {
                let body = response.json::<AccountApiResponse>().await?;
                Ok(Some(body))
            }
            status => {
                tracing::error!("Account service returned {status} for account: {account_id}");
                Err(ClientError::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}
