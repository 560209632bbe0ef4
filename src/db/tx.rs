use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub account_number: String,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// Settled is sent over the wire as "COMPLETED"; the name/value pair must stay as is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "COMPLETED")]
    Settled,
    #[serde(rename = "FAILED")]
    Failed,
}

impl TransactionStatus {
    /// Wire strings in declaration order.
    pub const WIRE_VALUES: &'static [&'static str] = &["PENDING", "COMPLETED", "FAILED"];

    /// Case-sensitive lookup of a status by its wire string.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(TransactionStatus::Pending),
            "COMPLETED" => Some(TransactionStatus::Settled),
            "FAILED" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Settled => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
        }
    }

    /// Only pending transactions move, and only into a terminal state.
    pub fn can_transition_to(&self, target: TransactionStatus) -> bool {
        matches!(
            (self, target),
            (TransactionStatus::Pending, TransactionStatus::Settled)
                | (TransactionStatus::Pending, TransactionStatus::Failed)
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub account_number: String,
    pub status: TransactionStatus,
    pub description: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for Transaction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let raw_status: String = row.try_get("status")?;
        let status = TransactionStatus::from_wire(&raw_status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown transaction status: {raw_status}").into(),
        })?;

        Ok(Transaction {
            id: row.try_get("id")?,
            account_id: row.try_get("account_id")?,
            account_number: row.try_get("account_number")?,
            status,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

// Persistence port for transactions
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, new: NewTransaction) -> Result<Transaction, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, sqlx::Error>;

    /// Oldest first.
    async fn list_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error>;

    /// Compare-and-set on the status column. `None` when the row is gone or no
    /// longer holds `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<Option<Transaction>, sqlx::Error>;
}

const TRANSACTION_COLUMNS: &str =
    "id, account_id, account_number, status, description, created_at, updated_at";

pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn insert(&self, new: NewTransaction) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO transactions (id, account_id, account_number, status, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Transaction>(&query)
            .bind(Uuid::new_v4())
            .bind(new.account_id)
            .bind(&new.account_number)
            .bind(new.status.as_wire())
            .bind(&new.description)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1");

        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, sqlx::Error> {
        let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE account_id = "
        ));
        query_builder
            .push_bind(account_id)
            .push(" ORDER BY created_at ASC");

        query_builder
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE transactions SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status = $3
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Transaction>(&query)
            .bind(to.as_wire())
            .bind(id)
            .bind(from.as_wire())
            .fetch_optional(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_transaction(account_id: Uuid, status: TransactionStatus) -> NewTransaction {
        NewTransaction {
            account_id,
            account_number: "ACC-0001".to_string(),
            status,
            description: None,
        }
    }

    #[sqlx::test]
    async fn insert_then_find_by_id(pool: PgPool) {
        let repo = PgTransactionRepository::new(pool);
        let account_id = Uuid::new_v4();
        let new = NewTransaction {
            description: Some("rent payment".to_string()),
            ..new_transaction(account_id, TransactionStatus::Settled)
        };

        let inserted = repo.insert(new).await.unwrap();
        assert_eq!(inserted.account_id, account_id);
        assert_eq!(inserted.account_number, "ACC-0001");
        assert_eq!(inserted.status, TransactionStatus::Settled);
        assert_eq!(inserted.description.as_deref(), Some("rent payment"));
        assert_eq!(inserted.updated_at, None);

        let found = repo.find_by_id(inserted.id).await.unwrap();
        assert_eq!(found, Some(inserted));

        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[sqlx::test]
    async fn list_by_account_is_oldest_first(pool: PgPool) {
        let repo = PgTransactionRepository::new(pool);
        let account_id = Uuid::new_v4();

        let mut expected = Vec::new();
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Failed,
            TransactionStatus::Settled,
        ] {
            let tx = repo.insert(new_transaction(account_id, status)).await.unwrap();
            expected.push(tx.id);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        repo.insert(new_transaction(Uuid::new_v4(), TransactionStatus::Pending))
            .await
            .unwrap();

        let listed: Vec<Uuid> = repo
            .list_by_account(account_id)
            .await
            .unwrap()
            .into_iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(listed, expected);

        assert!(repo.list_by_account(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[sqlx::test]
    async fn update_status_swaps_only_from_expected_status(pool: PgPool) {
        let repo = PgTransactionRepository::new(pool);
        let tx = repo
            .insert(new_transaction(Uuid::new_v4(), TransactionStatus::Pending))
            .await
            .unwrap();

        let stale = repo
            .update_status(tx.id, TransactionStatus::Settled, TransactionStatus::Failed)
            .await
            .unwrap();
        assert_eq!(stale, None);

        let updated = repo
            .update_status(tx.id, TransactionStatus::Pending, TransactionStatus::Settled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TransactionStatus::Settled);
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, tx.created_at);

        let again = repo
            .update_status(tx.id, TransactionStatus::Pending, TransactionStatus::Failed)
            .await
            .unwrap();
        assert_eq!(again, None);

        let missing = repo
            .update_status(Uuid::new_v4(), TransactionStatus::Pending, TransactionStatus::Failed)
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[sqlx::test]
    async fn unknown_stored_status_fails_to_decode(pool: PgPool) {
        sqlx::query("ALTER TABLE transactions DROP CONSTRAINT transactions_status_check")
            .execute(&pool)
            .await
            .unwrap();
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO transactions (id, account_id, account_number, status) VALUES ($1, $2, 'ACC-0001', 'SETTLED')",
        )
        .bind(id)
        .bind(Uuid::new_v4())
        .execute(&pool)
        .await
        .unwrap();

        let repo = PgTransactionRepository::new(pool);
        assert!(matches!(
            repo.find_by_id(id).await,
            Err(sqlx::Error::ColumnDecode { .. })
        ));
    }

    #[test]
    fn settled_keeps_completed_wire_value() {
        assert_eq!(TransactionStatus::Settled.as_wire(), "COMPLETED");
        assert_eq!(
            TransactionStatus::from_wire("COMPLETED"),
            Some(TransactionStatus::Settled)
        );
        assert_eq!(TransactionStatus::from_wire("SETTLED"), None);
        assert_eq!(
            serde_json::to_value(TransactionStatus::Settled).unwrap(),
            serde_json::json!("COMPLETED")
        );
    }

    #[test]
    fn wire_lookup_is_case_sensitive() {
        assert_eq!(TransactionStatus::from_wire("PENDING"), Some(TransactionStatus::Pending));
        assert_eq!(TransactionStatus::from_wire("pending"), None);
        assert_eq!(TransactionStatus::from_wire("Failed"), None);
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Settled,
            TransactionStatus::Failed,
        ] {
            assert_eq!(TransactionStatus::from_wire(status.as_wire()), Some(status));
        }
        for wire in TransactionStatus::WIRE_VALUES {
            assert_eq!(TransactionStatus::from_wire(wire).map(|s| s.as_wire()), Some(*wire));
        }
    }

    #[test]
    fn only_pending_transactions_transition() {
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Settled));
        assert!(TransactionStatus::Pending.can_transition_to(TransactionStatus::Failed));
        assert!(!TransactionStatus::Pending.can_transition_to(TransactionStatus::Pending));
        assert!(!TransactionStatus::Settled.can_transition_to(TransactionStatus::Failed));
        assert!(!TransactionStatus::Failed.can_transition_to(TransactionStatus::Settled));
        assert!(!TransactionStatus::Settled.can_transition_to(TransactionStatus::Pending));
    }

    #[test]
    fn transaction_serializes_camel_case_without_empty_optionals() {
        let tx = Transaction {
            id: Uuid::nil(),
            account_id: Uuid::nil(),
            account_number: "ACC-001".to_string(),
            status: TransactionStatus::Pending,
            description: None,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
            updated_at: None,
        };

        let body = serde_json::to_value(&tx).unwrap();
        assert_eq!(body["accountNumber"], "ACC-001");
        assert_eq!(body["status"], "PENDING");
        assert!(body.get("description").is_none());
        assert!(body.get("updatedAt").is_none());
    }
}
