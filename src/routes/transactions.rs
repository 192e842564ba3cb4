use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{Transaction, TransactionFilter};
use crate::services::transaction_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portfolio/:portfolio_id", get(list_transactions))
        .route("/:id", get(get_transaction))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Path(portfolio_id): Path<Uuid>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    info!("GET /transactions/portfolio/{} - Listing transactions", portfolio_id);
    let transactions =
        transaction_service::list_for_portfolio(&state.pool, portfolio_id, claims.sub, filter).await?;
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, AppError> {
    info!("GET /transactions/{} - Fetching transaction", id);
    let transaction = transaction_service::fetch_one(&state.pool, id, claims.sub).await?;
    Ok(Json(transaction))
}
