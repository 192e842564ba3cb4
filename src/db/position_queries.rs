use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Position;

const POSITION_COLUMNS: &str =
    "id, portfolio_id, security_id, quantity, avg_cost_per_share, current_value, version, created_at, updated_at";

pub async fn insert(exec: impl PgExecutor<'_>, position: &Position) -> Result<Position, sqlx::Error> {
    sqlx::query_as::<_, Position>(
        "INSERT INTO positions (id, portfolio_id, security_id, quantity, avg_cost_per_share, current_value, version, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, portfolio_id, security_id, quantity, avg_cost_per_share, current_value, version, created_at, updated_at",
    )
    .bind(position.id)
    .bind(position.portfolio_id)
    .bind(position.security_id)
    .bind(&position.quantity)
    .bind(&position.avg_cost_per_share)
    .bind(&position.current_value)
    .bind(position.version)
    .bind(position.created_at)
    .bind(position.updated_at)
    .fetch_one(exec)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!("SELECT {POSITION_COLUMNS} FROM positions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_portfolio(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {POSITION_COLUMNS} FROM positions WHERE portfolio_id = $1 ORDER BY created_at"
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_for_security(
    exec: impl PgExecutor<'_>,
    portfolio_id: Uuid,
    security_id: Uuid,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(&format!(
        "SELECT {POSITION_COLUMNS} FROM positions WHERE portfolio_id = $1 AND security_id = $2"
    ))
    .bind(portfolio_id)
    .bind(security_id)
    .fetch_optional(exec)
    .await
}

/// Writes a fill's outcome guarded by the optimistic version.
pub async fn update_holding(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    quantity: &BigDecimal,
    avg_cost_per_share: &BigDecimal,
    current_value: &BigDecimal,
    expected_version: i32,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(
        "UPDATE positions
         SET quantity = $2, avg_cost_per_share = $3, current_value = $4, version = version + 1, updated_at = now()
         WHERE id = $1 AND version = $5
         RETURNING id, portfolio_id, security_id, quantity, avg_cost_per_share, current_value, version, created_at, updated_at",
    )
    .bind(id)
    .bind(quantity)
    .bind(avg_cost_per_share)
    .bind(current_value)
    .bind(expected_version)
    .fetch_optional(exec)
    .await
}

pub async fn update_current_value(
    pool: &PgPool,
    id: Uuid,
    current_value: &BigDecimal,
) -> Result<Option<Position>, sqlx::Error> {
    sqlx::query_as::<_, Position>(
        "UPDATE positions SET current_value = $2, updated_at = now()
         WHERE id = $1
         RETURNING id, portfolio_id, security_id, quantity, avg_cost_per_share, current_value, version, created_at, updated_at",
    )
    .bind(id)
    .bind(current_value)
    .fetch_optional(pool)
    .await
}

pub async fn delete(exec: impl PgExecutor<'_>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM positions WHERE id = $1")
        .bind(id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

/// Service-level cascade used when a portfolio is soft-deleted.
pub async fn delete_by_portfolio(exec: impl PgExecutor<'_>, portfolio_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM positions WHERE portfolio_id = $1")
        .bind(portfolio_id)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_distinct_securities(
    exec: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(DISTINCT p.security_id)
         FROM positions p
         JOIN portfolios pf ON pf.id = p.portfolio_id
         WHERE pf.user_id = $1 AND pf.active = TRUE",
    )
    .bind(user_id)
    .fetch_one(exec)
    .await?;
    Ok(row.0)
}
