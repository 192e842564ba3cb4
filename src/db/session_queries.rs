use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Session;

pub async fn insert(pool: &PgPool, session: &Session) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "INSERT INTO sessions (id, user_id, token_id, expires_at, revoked, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, user_id, token_id, expires_at, revoked, created_at",
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(session.token_id)
    .bind(session.expires_at)
    .bind(session.revoked)
    .bind(session.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_token_id(pool: &PgPool, token_id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "SELECT id, user_id, token_id, expires_at, revoked, created_at
         FROM sessions WHERE token_id = $1",
    )
    .bind(token_id)
    .fetch_optional(pool)
    .await
}

pub async fn revoke(pool: &PgPool, token_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE sessions SET revoked = TRUE WHERE token_id = $1")
        .bind(token_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Removes sessions that are past expiry or already revoked.
pub async fn delete_stale(
    pool: &PgPool,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1 OR revoked = TRUE")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
