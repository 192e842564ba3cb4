use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Lesson, LessonProgress};

pub async fn fetch_lessons(pool: &PgPool) -> Result<Vec<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>(
        "SELECT id, slug, title, body, ordinal, created_at FROM lessons ORDER BY ordinal",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_lesson(pool: &PgPool, id: Uuid) -> Result<Option<Lesson>, sqlx::Error> {
    sqlx::query_as::<_, Lesson>("SELECT id, slug, title, body, ordinal, created_at FROM lessons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Creates or updates the (user, lesson) progress row in one statement.
pub async fn upsert_progress(
    pool: &PgPool,
    user_id: Uuid,
    lesson_id: Uuid,
    status: &str,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
) -> Result<LessonProgress, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(
        "INSERT INTO lesson_progress (id, user_id, lesson_id, status, completed_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, now())
         ON CONFLICT (user_id, lesson_id)
         DO UPDATE SET status = EXCLUDED.status, completed_at = EXCLUDED.completed_at, updated_at = now()
         RETURNING id, user_id, lesson_id, status, completed_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(lesson_id)
    .bind(status)
    .bind(completed_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_progress(
    pool: &PgPool,
    user_id: Uuid,
    lesson_id: Uuid,
) -> Result<Option<LessonProgress>, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(
        "SELECT id, user_id, lesson_id, status, completed_at, updated_at
         FROM lesson_progress WHERE user_id = $1 AND lesson_id = $2",
    )
    .bind(user_id)
    .bind(lesson_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_all_progress(pool: &PgPool, user_id: Uuid) -> Result<Vec<LessonProgress>, sqlx::Error> {
    sqlx::query_as::<_, LessonProgress>(
        "SELECT lp.id, lp.user_id, lp.lesson_id, lp.status, lp.completed_at, lp.updated_at
         FROM lesson_progress lp
         JOIN lessons l ON l.id = lp.lesson_id
         WHERE lp.user_id = $1
         ORDER BY l.ordinal",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
