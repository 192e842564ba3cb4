use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Seeded learning content, ordered by `ordinal`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: uuid::Uuid,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub ordinal: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonProgress {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    pub lesson_id: uuid::Uuid,
    pub status: String,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
