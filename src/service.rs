use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::client::{AccountClient, ClientError};
use crate::db::tx::{NewTransaction, Transaction, TransactionRepository, TransactionStatus};
use crate::dto::account::AccountStatus;
use crate::dto::create_transaction::CreateTransactionDto;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("account {0} was not found")]
    AccountNotFound(Uuid),

    #[error("account {0} is currently unavailable")]
    AccountUnavailable(Uuid),

    #[error("account {id} is {status} and cannot take transactions")]
    AccountNotActive { id: Uuid, status: AccountStatus },

    #[error("transaction {0} was not found")]
    TransactionNotFound(Uuid),

    #[error("cannot move transaction from {from} to {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("transaction {0} was modified concurrently")]
    Conflict(Uuid),

    #[error(transparent)]
    Upstream(#[from] ClientError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// Transaction service
pub struct TransactionService {
    repo: Arc<dyn TransactionRepository>,
    accounts: Arc<dyn AccountClient>,
}

impl TransactionService {
    pub fn new(repo: Arc<dyn TransactionRepository>, accounts: Arc<dyn AccountClient>) -> Self {
        Self { repo, accounts }
    }

    /// Record a transaction against an account that exists and is open.
    pub async fn create(&self, dto: CreateTransactionDto) -> Result<Transaction, ServiceError> {
        let account_id = dto.account_id;
        tracing::info!("Creating {} transaction for account: {account_id}", dto.status);

        let response = self
            .accounts
            .fetch_account(account_id)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))?;

        if !response.success() {
            tracing::warn!("Account service reported failure for account: {account_id}");
            return Err(ServiceError::AccountUnavailable(account_id));
        }

        let account = response.account();
        if !account.status.accepts_transactions() {
            tracing::warn!("Rejected transaction for {} account: {account_id}", account.status);
            return Err(ServiceError::AccountNotActive {
                id: account_id,
                status: account.status,
            });
        }

        let transaction = self
            .repo
            .insert(NewTransaction {
                account_id,
                account_number: account.number.clone(),
                status: dto.status,
                description: dto.description,
            })
            .await?;

        tracing::info!("Transaction created with id: {}", transaction.id);
        Ok(transaction)
    }

    pub async fn get(&self, id: Uuid) -> Result<Transaction, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::TransactionNotFound(id))
    }

    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = self.repo.list_by_account(account_id).await?;
        tracing::info!(
            "Found {} transactions for account: {account_id}",
            transactions.len()
        );
        Ok(transactions)
    }

    /// Move a pending transaction into a terminal state.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
    ) -> Result<Transaction, ServiceError> {
        let current = self.get(id).await?;

        if !current.status.can_transition_to(status) {
            tracing::warn!("Refused transition {} -> {status} for transaction: {id}", current.status);
            return Err(ServiceError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let updated = self
            .repo
            .update_status(id, current.status, status)
            .await?
            .ok_or(ServiceError::Conflict(id))?;

        tracing::info!("Transaction {id} moved to {status}");
        Ok(updated)
    }
}
