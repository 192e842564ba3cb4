use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{CancelOrder, CreateOrder, ExecuteOrder, Order};
use crate::services::order_service::{self, FillOutcome};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_order))
        .route("/portfolio/:portfolio_id", get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/execute", post(execute_order))
        .route("/:id/cancel", post(cancel_order))
}

pub async fn submit_order(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<CreateOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    info!("POST /orders - Submitting order");
    let order = order_service::submit(
        &state.pool,
        state.price_provider.as_ref(),
        &state.trading,
        claims.sub,
        data,
    )
    .await
    .map_err(|e| {
        error!("Order submission failed: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    claims: Claims,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, AppError> {
    info!("GET /orders/portfolio/{} - Listing orders", portfolio_id);
    let orders = order_service::list_for_portfolio(&state.pool, portfolio_id, claims.sub).await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    info!("GET /orders/{} - Fetching order", id);
    let order = order_service::fetch_one(&state.pool, id, claims.sub).await?;
    Ok(Json(order))
}

pub async fn execute_order(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<ExecuteOrder>,
) -> Result<Json<FillOutcome>, AppError> {
    info!("POST /orders/{}/execute - Executing order", id);
    let outcome = order_service::execute(
        &state.pool,
        state.price_provider.as_ref(),
        &state.trading,
        claims.sub,
        id,
        data,
    )
    .await
    .map_err(|e| {
        error!("Execution of order {} failed: {}", id, e);
        e
    })?;
    Ok(Json(outcome))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    Json(data): Json<CancelOrder>,
) -> Result<Json<Order>, AppError> {
    info!("POST /orders/{}/cancel - Cancelling order", id);
    let order = order_service::cancel(&state.pool, claims.sub, id, data).await.map_err(|e| {
        error!("Cancellation of order {} failed: {}", id, e);
        e
    })?;
    Ok(Json(order))
}
