use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Security;

const SECURITY_COLUMNS: &str = "id, symbol, name, security_type, sector, exchange, active, created_at";

pub async fn insert(pool: &PgPool, security: &Security) -> Result<Security, sqlx::Error> {
    sqlx::query_as::<_, Security>(
        "INSERT INTO securities (id, symbol, name, security_type, sector, exchange, active, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id, symbol, name, security_type, sector, exchange, active, created_at",
    )
    .bind(security.id)
    .bind(&security.symbol)
    .bind(&security.name)
    .bind(&security.security_type)
    .bind(&security.sector)
    .bind(&security.exchange)
    .bind(security.active)
    .bind(security.created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Security>, sqlx::Error> {
    sqlx::query_as::<_, Security>(&format!("SELECT {SECURITY_COLUMNS} FROM securities WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_symbol(pool: &PgPool, symbol: &str) -> Result<Option<Security>, sqlx::Error> {
    sqlx::query_as::<_, Security>(&format!(
        "SELECT {SECURITY_COLUMNS} FROM securities WHERE symbol = $1"
    ))
    .bind(symbol)
    .fetch_optional(pool)
    .await
}

pub async fn symbol_exists(pool: &PgPool, symbol: &str) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM securities WHERE symbol = $1)")
        .bind(symbol)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Lists active securities, optionally filtered by symbol prefix.
pub async fn search(pool: &PgPool, prefix: Option<&str>) -> Result<Vec<Security>, sqlx::Error> {
    match prefix {
        Some(p) => {
            sqlx::query_as::<_, Security>(&format!(
                "SELECT {SECURITY_COLUMNS} FROM securities
                 WHERE active = TRUE AND symbol LIKE $1 || '%'
                 ORDER BY symbol"
            ))
            .bind(p.to_uppercase())
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Security>(&format!(
                "SELECT {SECURITY_COLUMNS} FROM securities WHERE active = TRUE ORDER BY symbol"
            ))
            .fetch_all(pool)
            .await
        }
    }
}
