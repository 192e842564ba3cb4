use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{position_queries, security_queries};
use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::Position;
use crate::services::portfolio_service;

pub async fn list(pool: &PgPool, portfolio_id: Uuid, user_id: Uuid) -> Result<Vec<Position>, AppError> {
    portfolio_service::fetch_owned(pool, portfolio_id, user_id).await?;
    Ok(position_queries::fetch_by_portfolio(pool, portfolio_id).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Position, AppError> {
    let position = position_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Position".into()))?;
    portfolio_service::fetch_owned(pool, position.portfolio_id, user_id).await?;
    Ok(position)
}

/// Re-marks a position's `current_value` against the oracle's latest quote.
pub async fn revalue(
    pool: &PgPool,
    provider: &dyn PriceProvider,
    id: Uuid,
    user_id: Uuid,
) -> Result<Position, AppError> {
    let position = fetch_one(pool, id, user_id).await?;
    let security = security_queries::fetch_one(pool, position.security_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Security".into()))?;
    let quote = provider.quote(&security.symbol).await?;
    let current_value = &position.quantity * &quote.price;
    position_queries::update_current_value(pool, id, &current_value)
        .await?
        .ok_or_else(|| AppError::NotFound("Position".into()))
}
