use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{AccountStatus, UpdateProfile, UserProfile};
use crate::services::user_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile).put(update_profile))
        .route("/me/status", put(change_status))
}

pub async fn get_profile(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<UserProfile>, AppError> {
    info!("GET /users/me - Fetching profile for {}", claims.sub);
    let profile = user_service::fetch_profile(&state.pool, claims.sub).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<UpdateProfile>,
) -> Result<Json<UserProfile>, AppError> {
    info!("PUT /users/me - Updating profile for {}", claims.sub);
    let profile = user_service::update_profile(&state.pool, claims.sub, data)
        .await
        .map_err(|e| {
            error!("Failed to update profile for {}: {}", claims.sub, e);
            e
        })?;
    Ok(Json(profile))
}

#[derive(serde::Deserialize)]
pub struct ChangeStatus {
    pub status: AccountStatus,
}

pub async fn change_status(
    State(state): State<AppState>,
    claims: Claims,
    Json(data): Json<ChangeStatus>,
) -> Result<Json<UserProfile>, AppError> {
    info!("PUT /users/me/status - {} -> {}", claims.sub, data.status);
    let profile = user_service::change_status(&state.pool, claims.sub, data.status).await?;
    Ok(Json(profile))
}
