use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::Position;
use crate::services::position_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/portfolio/:portfolio_id", get(list_positions))
        .route("/:id", get(get_position))
        .route("/:id/revalue", post(revalue_position))
}

pub async fn list_positions(
    State(state): State<AppState>,
    claims: Claims,
    Path(portfolio_id): Path<Uuid>,
) -> Result<Json<Vec<Position>>, AppError> {
    info!("GET /positions/portfolio/{} - Listing positions", portfolio_id);
    let positions = position_service::list(&state.pool, portfolio_id, claims.sub).await?;
    Ok(Json(positions))
}

pub async fn get_position(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Position>, AppError> {
    info!("GET /positions/{} - Fetching position", id);
    let position = position_service::fetch_one(&state.pool, id, claims.sub).await?;
    Ok(Json(position))
}

pub async fn revalue_position(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<Position>, AppError> {
    info!("POST /positions/{}/revalue - Revaluing position", id);
    let position =
        position_service::revalue(&state.pool, state.price_provider.as_ref(), id, claims.sub).await?;
    Ok(Json(position))
}
