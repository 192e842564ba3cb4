use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::db::{achievement_queries, position_queries};
use crate::errors::AppError;
use crate::models::{self, Achievement, EarnedAchievement};

const DIVERSIFIED_THRESHOLD: i64 = 3;

pub async fn list_catalog(pool: &PgPool) -> Result<Vec<Achievement>, AppError> {
    Ok(achievement_queries::fetch_catalog(pool).await?)
}

pub async fn list_earned(pool: &PgPool, user_id: Uuid) -> Result<Vec<EarnedAchievement>, AppError> {
    Ok(achievement_queries::fetch_earned(pool, user_id).await?)
}

// The hooks below run inside the caller's transaction so awards commit or
// roll back with the event that triggered them. Awarding is idempotent.

pub async fn on_first_deposit(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<(), AppError> {
    if achievement_queries::award_once(&mut **tx, user_id, models::FIRST_DEPOSIT).await? > 0 {
        info!("User {} earned {}", user_id, models::FIRST_DEPOSIT);
    }
    Ok(())
}

pub async fn on_fill(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<(), AppError> {
    if achievement_queries::award_once(&mut **tx, user_id, models::FIRST_TRADE).await? > 0 {
        info!("User {} earned {}", user_id, models::FIRST_TRADE);
    }
    let distinct = position_queries::count_distinct_securities(&mut **tx, user_id).await?;
    if distinct >= DIVERSIFIED_THRESHOLD
        && achievement_queries::award_once(&mut **tx, user_id, models::DIVERSIFIED).await? > 0
    {
        info!("User {} earned {}", user_id, models::DIVERSIFIED);
    }
    Ok(())
}

pub async fn on_lesson_complete(pool: &PgPool, user_id: Uuid) -> Result<(), AppError> {
    if achievement_queries::award_once(pool, user_id, models::LESSON_COMPLETE).await? > 0 {
        info!("User {} earned {}", user_id, models::LESSON_COMPLETE);
    }
    Ok(())
}
