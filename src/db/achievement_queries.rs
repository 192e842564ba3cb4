use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Achievement, EarnedAchievement};

pub async fn fetch_catalog(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
    sqlx::query_as::<_, Achievement>(
        "SELECT id, code, name, description, created_at FROM achievements ORDER BY code",
    )
    .fetch_all(pool)
    .await
}

/// Awards an achievement by code if the user does not already hold it.
/// Returns the number of rows written (0 when already earned or the code
/// is unknown), so callers can log first-time awards.
pub async fn award_once(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
    code: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO user_achievements (id, user_id, achievement_id, earned_at)
         SELECT $1, $2, a.id, now() FROM achievements a WHERE a.code = $3
         ON CONFLICT (user_id, achievement_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(code)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

pub async fn fetch_earned(pool: &PgPool, user_id: Uuid) -> Result<Vec<EarnedAchievement>, sqlx::Error> {
    sqlx::query_as::<_, EarnedAchievement>(
        "SELECT a.code, a.name, a.description, ua.earned_at
         FROM user_achievements ua
         JOIN achievements a ON a.id = ua.achievement_id
         WHERE ua.user_id = $1
         ORDER BY ua.earned_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
