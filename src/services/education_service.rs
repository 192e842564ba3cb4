use sqlx::PgPool;
use uuid::Uuid;

use crate::db::education_queries;
use crate::errors::AppError;
use crate::models::{Lesson, LessonProgress, ProgressStatus};
use crate::services::achievement_service;

pub async fn list_lessons(pool: &PgPool) -> Result<Vec<Lesson>, AppError> {
    Ok(education_queries::fetch_lessons(pool).await?)
}

pub async fn fetch_lesson(pool: &PgPool, id: Uuid) -> Result<Lesson, AppError> {
    education_queries::fetch_lesson(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson".into()))
}

pub async fn list_progress(pool: &PgPool, user_id: Uuid) -> Result<Vec<LessonProgress>, AppError> {
    Ok(education_queries::fetch_all_progress(pool, user_id).await?)
}

/// Marks a lesson IN_PROGRESS unless it is already completed.
pub async fn start_lesson(pool: &PgPool, user_id: Uuid, lesson_id: Uuid) -> Result<LessonProgress, AppError> {
    fetch_lesson(pool, lesson_id).await?;
    if let Some(existing) = education_queries::fetch_progress(pool, user_id, lesson_id).await? {
        if existing.status == ProgressStatus::Completed.as_str() {
            return Ok(existing);
        }
    }
    Ok(education_queries::upsert_progress(
        pool,
        user_id,
        lesson_id,
        ProgressStatus::InProgress.as_str(),
        None,
    )
    .await?)
}

/// Marks a lesson COMPLETED and stamps the completion time.
pub async fn complete_lesson(
    pool: &PgPool,
    user_id: Uuid,
    lesson_id: Uuid,
) -> Result<LessonProgress, AppError> {
    fetch_lesson(pool, lesson_id).await?;
    let progress = education_queries::upsert_progress(
        pool,
        user_id,
        lesson_id,
        ProgressStatus::Completed.as_str(),
        Some(chrono::Utc::now()),
    )
    .await?;
    achievement_service::on_lesson_complete(pool, user_id).await?;
    Ok(progress)
}
