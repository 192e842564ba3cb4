use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Portfolio;

const PORTFOLIO_COLUMNS: &str =
    "id, user_id, name, cash_balance, total_value, active, version, created_at, updated_at";

pub async fn insert(exec: impl PgExecutor<'_>, portfolio: &Portfolio) -> Result<Portfolio, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "INSERT INTO portfolios (id, user_id, name, cash_balance, total_value, active, version, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, user_id, name, cash_balance, total_value, active, version, created_at, updated_at",
    )
    .bind(portfolio.id)
    .bind(portfolio.user_id)
    .bind(&portfolio.name)
    .bind(&portfolio.cash_balance)
    .bind(&portfolio.total_value)
    .bind(portfolio.active)
    .bind(portfolio.version)
    .bind(portfolio.created_at)
    .bind(portfolio.updated_at)
    .fetch_one(exec)
    .await
}

pub async fn fetch_one(exec: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {PORTFOLIO_COLUMNS} FROM portfolios WHERE id = $1 AND active = TRUE"
    ))
    .bind(id)
    .fetch_optional(exec)
    .await
}

pub async fn fetch_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(&format!(
        "SELECT {PORTFOLIO_COLUMNS} FROM portfolios
         WHERE user_id = $1 AND active = TRUE
         ORDER BY created_at"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn name_taken(pool: &PgPool, user_id: Uuid, name: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM portfolios WHERE user_id = $1 AND name = $2 AND active = TRUE)",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn rename(pool: &PgPool, id: Uuid, name: &str) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "UPDATE portfolios SET name = $2, updated_at = now()
         WHERE id = $1 AND active = TRUE
         RETURNING id, user_id, name, cash_balance, total_value, active, version, created_at, updated_at",
    )
    .bind(id)
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Writes new balances guarded by the optimistic version; returns None when
/// another writer got there first.
pub async fn update_balances(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    cash_balance: &BigDecimal,
    total_value: &BigDecimal,
    expected_version: i32,
) -> Result<Option<Portfolio>, sqlx::Error> {
    sqlx::query_as::<_, Portfolio>(
        "UPDATE portfolios
         SET cash_balance = $2, total_value = $3, version = version + 1, updated_at = now()
         WHERE id = $1 AND version = $4 AND active = TRUE
         RETURNING id, user_id, name, cash_balance, total_value, active, version, created_at, updated_at",
    )
    .bind(id)
    .bind(cash_balance)
    .bind(total_value)
    .bind(expected_version)
    .fetch_optional(exec)
    .await
}

pub async fn soft_delete(exec: impl PgExecutor<'_>, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE portfolios SET active = FALSE, updated_at = now() WHERE id = $1 AND active = TRUE",
    )
    .bind(id)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}
