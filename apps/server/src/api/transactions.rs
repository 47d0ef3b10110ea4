use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use crypto_ledger_core::transactions::{Transaction, TransactionInput};

use crate::{error::ApiResult, main_lib::AppState};

async fn list_transactions(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transaction_service.list_transactions()?;
    Ok(Json(transactions))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = id?;
    let transaction = state.transaction_service.get_transaction(id)?;
    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Json(input) = payload?;
    let created = state.transaction_service.create_transaction(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<Json<Transaction>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let updated = state
        .transaction_service
        .update_transaction(id, input)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.transaction_service.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
