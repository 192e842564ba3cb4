use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Transaction, TransactionFilter};

const TRANSACTION_COLUMNS: &str = "id, order_id, portfolio_id, security_id, transaction_type, quantity, \
     price_per_share, total_amount, fees, net_amount, status, transaction_date, settlement_date, settled_at, created_at";

pub async fn insert(exec: impl PgExecutor<'_>, tx: &Transaction) -> Result<Transaction, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "INSERT INTO transactions (id, order_id, portfolio_id, security_id, transaction_type, quantity,
                                   price_per_share, total_amount, fees, net_amount, status,
                                   transaction_date, settlement_date, settled_at, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING id, order_id, portfolio_id, security_id, transaction_type, quantity,
                   price_per_share, total_amount, fees, net_amount, status,
                   transaction_date, settlement_date, settled_at, created_at",
    )
    .bind(tx.id)
    .bind(tx.order_id)
    .bind(tx.portfolio_id)
    .bind(tx.security_id)
    .bind(&tx.transaction_type)
    .bind(&tx.quantity)
    .bind(&tx.price_per_share)
    .bind(&tx.total_amount)
    .bind(&tx.fees)
    .bind(&tx.net_amount)
    .bind(&tx.status)
    .bind(tx.transaction_date)
    .bind(tx.settlement_date)
    .bind(tx.settled_at)
    .bind(tx.created_at)
    .fetch_one(exec)
    .await
}

pub async fn fetch_one(pool: &PgPool, id: Uuid) -> Result<Option<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Portfolio history with optional type/status/date-range filters. NULL
/// filter parameters are skipped by the `($n IS NULL OR ...)` guards.
pub async fn fetch_by_portfolio(
    pool: &PgPool,
    portfolio_id: Uuid,
    filter: &TransactionFilter,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions
         WHERE portfolio_id = $1
           AND ($2::text IS NULL OR transaction_type = $2)
           AND ($3::text IS NULL OR status = $3)
           AND ($4::timestamptz IS NULL OR transaction_date >= $4)
           AND ($5::timestamptz IS NULL OR transaction_date <= $5)
         ORDER BY transaction_date DESC"
    ))
    .bind(portfolio_id)
    .bind(filter.transaction_type.map(|t| t.as_str()))
    .bind(filter.status.map(|s| s.as_str()))
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(pool)
    .await
}

/// Unsettled transactions whose settlement date has arrived.
pub async fn fetch_due_for_settlement(
    pool: &PgPool,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions
         WHERE status = 'PENDING' AND settlement_date <= $1
         ORDER BY settlement_date"
    ))
    .bind(now)
    .fetch_all(pool)
    .await
}

/// Marks one transaction settled. Guarded on PENDING so re-running the
/// sweep is a no-op for rows settled in the meantime.
pub async fn mark_settled(
    pool: &PgPool,
    id: Uuid,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE transactions SET status = 'COMPLETED', settled_at = $2
         WHERE id = $1 AND status = 'PENDING'",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
