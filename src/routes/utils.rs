use axum::{
    body::Bytes,
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::dto::validation::ValidationError;
use crate::service::ServiceError;

/// Error body returned by every transaction route.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({
                "statusCode": status.as_u16(),
                "message": message.into(),
            }),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!("Rejected request body: {err}");
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "statusCode": StatusCode::BAD_REQUEST.as_u16(),
                "message": "Validation failed",
                "errors": err.violations(),
            }),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!("Rejected request path: {}", rejection.body_text());
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        tracing::warn!("Failed to read request body: {}", rejection.body_text());
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

/// Parse a request body for field validation. An empty body is read as `{}` so
/// that every required field gets reported.
pub fn json_body(bytes: &Bytes) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|err| {
        tracing::warn!("Request body is not valid JSON: {err}");
        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Request body is not valid JSON: {err}"),
        )
    })
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::AccountNotFound(_) | ServiceError::TransactionNotFound(_) => {
                ApiError::new(StatusCode::NOT_FOUND, err.to_string())
            }
            ServiceError::AccountUnavailable(_)
            | ServiceError::AccountNotActive { .. }
            | ServiceError::InvalidTransition { .. } => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ServiceError::Conflict(_) => ApiError::new(StatusCode::CONFLICT, err.to_string()),
            ServiceError::Upstream(err) => {
                tracing::error!("Account service call failed: {err}");
                ApiError::new(StatusCode::BAD_GATEWAY, "Account service unavailable")
            }
            ServiceError::Database(err) => {
                tracing::error!("Database operation failed: {err}");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
