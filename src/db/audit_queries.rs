use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::AuditRecord;

pub async fn insert(
    exec: impl PgExecutor<'_>,
    user_id: Option<Uuid>,
    action: &str,
    entity_type: &str,
    entity_id: Option<Uuid>,
    detail: serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_records (id, user_id, action, entity_type, entity_id, detail, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, now())",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action)
    .bind(entity_type)
    .bind(entity_id)
    .bind(detail)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn fetch_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<AuditRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuditRecord>(
        "SELECT id, user_id, action, entity_type, entity_id, detail, created_at
         FROM audit_records
         WHERE user_id = $1
         ORDER BY created_at DESC
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
