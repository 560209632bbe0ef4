use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::client::{AccountClient, ClientError, HttpAccountClient};
use crate::config::Config;
use crate::db::tx::{PgTransactionRepository, TransactionRepository};
use crate::routes;
use crate::service::TransactionService;

/// Composition root for the transaction feature: routes on top of the service,
/// the service on top of persistence and the account service client.
pub struct TransactionModule {
    service: Arc<TransactionService>,
}

impl TransactionModule {
    pub fn new(repo: Arc<dyn TransactionRepository>, accounts: Arc<dyn AccountClient>) -> Self {
        Self {
            service: Arc::new(TransactionService::new(repo, accounts)),
        }
    }

    /// Wire the production implementations.
    pub fn from_config(pool: PgPool, config: &Config) -> Result<Self, ClientError> {
        let repo = PgTransactionRepository::new(pool);
        let accounts = HttpAccountClient::new(&config.account_service_url, config.http_timeout)?;
        tracing::info!("Account service client targets {}", config.account_service_url);

        Ok(Self::new(Arc::new(repo), Arc::new(accounts)))
    }

    pub fn router(&self) -> Router {
        routes::tx::tx_routes(self.service.clone())
    }
}
