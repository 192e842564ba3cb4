use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::db::transaction_queries;
use crate::errors::AppError;
use crate::models::{Transaction, TransactionFilter};
use crate::services::portfolio_service;

pub async fn list_for_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
    user_id: Uuid,
    filter: TransactionFilter,
) -> Result<Vec<Transaction>, AppError> {
    portfolio_service::fetch_owned(pool, portfolio_id, user_id).await?;
    Ok(transaction_queries::fetch_by_portfolio(pool, portfolio_id, &filter).await?)
}

pub async fn fetch_one(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Transaction, AppError> {
    let transaction = transaction_queries::fetch_one(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".into()))?;
    portfolio_service::fetch_owned(pool, transaction.portfolio_id, user_id).await?;
    Ok(transaction)
}

/// Settlement sweep: marks due PENDING transactions COMPLETED. Cash and
/// position effects were applied at creation, so this is bookkeeping only.
/// Each record settles independently; failures are logged and retried on
/// the next run.
pub async fn settle_due(pool: &PgPool) -> Result<u64, AppError> {
    let now = chrono::Utc::now();
    let due = transaction_queries::fetch_due_for_settlement(pool, now).await?;
    let mut settled = 0;
    for record in due {
        match transaction_queries::mark_settled(pool, record.id, now).await {
            Ok(n) => settled += n,
            Err(e) => warn!("Failed to settle transaction {}: {}", record.id, e),
        }
    }
    Ok(settled)
}
