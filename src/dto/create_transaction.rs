use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::db::tx::TransactionStatus;

use super::validation::{
    is_not_empty, is_string, is_uuid, string_field, validate_fields, FieldRule, ValidationError,
    ViolationKind,
};

fn is_transaction_status(value: &Value) -> Result<(), ViolationKind> {
    match value.as_str().and_then(TransactionStatus::from_wire) {
        Some(_) => Ok(()),
        None => Err(ViolationKind::IsEnum(TransactionStatus::WIRE_VALUES)),
    }
}

const STATUS_RULE: FieldRule = FieldRule {
    field: "status",
    optional: false,
    checks: &[is_not_empty, is_transaction_status],
};

const CREATE_TRANSACTION_RULES: &[FieldRule] = &[
    STATUS_RULE,
    FieldRule {
        field: "accountId",
        optional: false,
        checks: &[is_uuid, is_not_empty],
    },
    FieldRule {
        field: "description",
        optional: true,
        checks: &[is_string],
    },
];

const UPDATE_STATUS_RULES: &[FieldRule] = &[STATUS_RULE];

fn status_of(body: &Value) -> Result<TransactionStatus, ValidationError> {
    string_field(body, "status")
        .and_then(TransactionStatus::from_wire)
        .ok_or_else(|| {
            ValidationError::single("status", ViolationKind::IsEnum(TransactionStatus::WIRE_VALUES))
        })
}

/// Validated request to create a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionDto {
    pub status: TransactionStatus,
    pub account_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTransactionDto {
    /// Check an untyped body against every field rule and build the typed DTO.
    /// All violations are reported together.
    pub fn validate(body: &Value) -> Result<Self, ValidationError> {
        validate_fields(body, CREATE_TRANSACTION_RULES)?;

        let status = status_of(body)?;
        let account_id = string_field(body, "accountId")
            .and_then(|raw| Uuid::try_parse(raw).ok())
            .ok_or_else(|| ValidationError::single("accountId", ViolationKind::IsUuid))?;
        let description = string_field(body, "description").map(str::to_owned);

        Ok(Self {
            status,
            account_id,
            description,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateTransactionStatusDto {
    pub status: TransactionStatus,
}

impl UpdateTransactionStatusDto {
    pub fn validate(body: &Value) -> Result<Self, ValidationError> {
        validate_fields(body, UPDATE_STATUS_RULES)?;
        Ok(Self {
            status: status_of(body)?,
        })
    }
}
