use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{Achievement, EarnedAchievement};
use crate::services::achievement_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalog))
        .route("/earned", get(list_earned))
}

pub async fn list_catalog(State(state): State<AppState>) -> Result<Json<Vec<Achievement>>, AppError> {
    info!("GET /achievements - Listing catalog");
    let catalog = achievement_service::list_catalog(&state.pool).await?;
    Ok(Json(catalog))
}

pub async fn list_earned(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<EarnedAchievement>>, AppError> {
    info!("GET /achievements/earned - Listing achievements for {}", claims.sub);
    let earned = achievement_service::list_earned(&state.pool, claims.sub).await?;
    Ok(Json(earned))
}
