use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    extract::{ApiPath, ApiQuery},
    state::AppState,
    transactions::repo_types::{Transaction, TransactionItem},
    validation::DateRange,
};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions/:id", get(get_transaction))
}

#[derive(Debug, Serialize)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub header: Transaction,
    pub items: Vec<TransactionItem>,
}

#[instrument(skip(state, _auth))]
pub async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(range): ApiQuery<DateRange>,
) -> AppResult<Json<Vec<Transaction>>> {
    let (start, end) = range.bounds()?;
    Ok(Json(Transaction::list(&state.db, start, end).await?))
}

#[instrument(skip(state, _auth))]
pub async fn get_transaction(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiPath(transaction_id): ApiPath<i64>,
) -> AppResult<Json<TransactionDetail>> {
    let header = Transaction::find(&state.db, transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".into()))?;
    let items = TransactionItem::for_transaction(&state.db, transaction_id).await?;
    Ok(Json(TransactionDetail { header, items }))
}
