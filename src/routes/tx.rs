use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{sse::Event, IntoResponse, Sse},
    routing::{get, patch, post},
    Json, Router,
};
use futures::StreamExt;
use uuid::Uuid;

use crate::dto::create_transaction::{CreateTransactionDto, UpdateTransactionStatusDto};
use crate::service::TransactionService;

use super::utils::{json_body, ApiError};

async fn create_transaction(
    State(service): State<Arc<TransactionService>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Starting transaction creation process");

    // nothing reaches the service before it passes validation
    let dto = CreateTransactionDto::validate(&json_body(&body?)?)?;
    let transaction = service.create(dto).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn get_transaction(
    State(service): State<Arc<TransactionService>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(transaction_id) = path?;
    let transaction = service.get(transaction_id).await?;
    Ok((StatusCode::OK, Json(transaction)))
}

async fn update_transaction_status(
    State(service): State<Arc<TransactionService>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(transaction_id) = path?;
    let dto = UpdateTransactionStatusDto::validate(&json_body(&body?)?)?;
    let transaction = service.update_status(transaction_id, dto.status).await?;
    Ok((StatusCode::OK, Json(transaction)))
}

// stream every transaction recorded against an account
async fn list_account_transactions(
    State(service): State<Arc<TransactionService>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(account_id) = path?;
    let transactions = service.list_for_account(account_id).await?;

    let stream = futures::stream::iter(transactions)
        .map(|transaction| Event::default().id(transaction.id.to_string()).json_data(transaction));

    let sse = Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(std::time::Duration::from_secs(2))
            .text("keep-alive-text"),
    );

    Ok(sse)
}

pub fn tx_routes(service: Arc<TransactionService>) -> Router {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/:id", get(get_transaction))
        .route("/transactions/:id/status", patch(update_transaction_status))
        .route("/accounts/:account_id/transactions", get(list_account_transactions))
        .with_state(service)
}
