use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub id: uuid::Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub achievement_id: uuid::Uuid,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}

// Joined view for the API: the catalog entry plus when it was earned.
#[derive(Debug, Serialize, FromRow)]
pub struct EarnedAchievement {
    pub code: String,
    pub name: String,
    pub description: String,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}

// Seeded codes; awarding hooks live in achievement_service.
pub const FIRST_DEPOSIT: &str = "FIRST_DEPOSIT";
pub const FIRST_TRADE: &str = "FIRST_TRADE";
pub const DIVERSIFIED: &str = "DIVERSIFIED";
pub const LESSON_COMPLETE: &str = "LESSON_COMPLETE";
