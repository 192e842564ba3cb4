use axum::routing::post;
use axum::extract::State;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{LoginUser, RegisterUser, UserProfile};
use crate::services::auth_service::{self, AuthResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<RegisterUser>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    info!("POST /auth/register - Registering user");
    let profile = auth_service::register(&state.pool, data).await.map_err(|e| {
        error!("Registration failed: {}", e);
        e
    })?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(data): Json<LoginUser>,
) -> Result<Json<AuthResponse>, AppError> {
    info!("POST /auth/login - Logging in");
    let response = auth_service::login(&state.pool, &state.auth, data).await?;
    Ok(Json(response))
}

pub async fn logout(State(state): State<AppState>, claims: Claims) -> Result<Json<()>, AppError> {
    info!("POST /auth/logout - Logging out user {}", claims.sub);
    auth_service::logout(&state.pool, &claims).await?;
    Ok(Json(()))
}
