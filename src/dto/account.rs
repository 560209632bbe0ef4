use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Root,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    New,
    Active,
    Inactive,
    Blocked,
}

impl AccountStatus {
    pub fn accepts_transactions(&self) -> bool {
        matches!(self, AccountStatus::New | AccountStatus::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::New => write!(f, "new"),
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Inactive => write!(f, "inactive"),
            AccountStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// Account record as owned and served by the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub name: String,
    pub number: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Success/account envelope. The account is carried even when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountApiResponse {
    success: bool,
    account: Account,
}

impl AccountApiResponse {
    pub fn new(success: bool, account: Account) -> Self {
        Self { success, account }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}
