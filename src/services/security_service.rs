use sqlx::PgPool;
use uuid::Uuid;

use crate::db::security_queries;
use crate::errors::AppError;
use crate::models::{CreateSecurity, Security};

pub async fn create(pool: &PgPool, input: CreateSecurity) -> Result<Security, AppError> {
    let symbol = input.symbol.trim().to_uppercase();
    if symbol.is_empty() || symbol.len() > 12 {
        return Err(AppError::Validation("Symbol must be 1-12 characters".into()));
    }
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("Security name cannot be empty".into()));
    }
    if security_queries::symbol_exists(pool, &symbol).await? {
        return Err(AppError::AlreadyExists(format!("Security '{}'", symbol)));
    }
    let security = Security::new(CreateSecurity { symbol, ..input });
    Ok(security_queries::insert(pool, &security).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Security, AppError> {
    security_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Security".into()))
}

pub async fn fetch_by_symbol(pool: &PgPool, symbol: &str) -> Result<Security, AppError> {
    security_queries::fetch_by_symbol(pool, &symbol.trim().to_uppercase())
        .await?
        .ok_or_else(|| AppError::NotFound("Security".into()))
}

pub async fn search(pool: &PgPool, prefix: Option<&str>) -> Result<Vec<Security>, AppError> {
    Ok(security_queries::search(pool, prefix).await?)
}
