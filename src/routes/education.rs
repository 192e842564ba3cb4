use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use crate::auth::Claims;
use crate::errors::AppError;
use crate::models::{Lesson, LessonProgress};
use crate::services::education_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lessons", get(list_lessons))
        .route("/lessons/:id", get(get_lesson))
        .route("/lessons/:id/start", post(start_lesson))
        .route("/lessons/:id/complete", post(complete_lesson))
        .route("/progress", get(list_progress))
}

pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<Lesson>>, AppError> {
    info!("GET /education/lessons - Listing lessons");
    let lessons = education_service::list_lessons(&state.pool).await?;
    Ok(Json(lessons))
}

pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lesson>, AppError> {
    info!("GET /education/lessons/{} - Fetching lesson", id);
    let lesson = education_service::fetch_lesson(&state.pool, id).await?;
    Ok(Json(lesson))
}

pub async fn start_lesson(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonProgress>, AppError> {
    info!("POST /education/lessons/{}/start - Starting lesson", id);
    let progress = education_service::start_lesson(&state.pool, claims.sub, id).await?;
    Ok(Json(progress))
}

pub async fn complete_lesson(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonProgress>, AppError> {
    info!("POST /education/lessons/{}/complete - Completing lesson", id);
    let progress = education_service::complete_lesson(&state.pool, claims.sub, id).await?;
    Ok(Json(progress))
}

pub async fn list_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<LessonProgress>>, AppError> {
    info!("GET /education/progress - Listing progress for {}", claims.sub);
    let progress = education_service::list_progress(&state.pool, claims.sub).await?;
    Ok(Json(progress))
}
