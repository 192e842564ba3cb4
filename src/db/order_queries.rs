use bigdecimal::BigDecimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Order;

const ORDER_COLUMNS: &str = "id, portfolio_id, security_id, side, order_type, quantity, filled_quantity, \
     limit_price, stop_price, status, reject_reason, placed_at, expires_at, updated_at";

pub async fn insert(exec: impl PgExecutor<'_>, order: &Order) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "INSERT INTO orders (id, portfolio_id, security_id, side, order_type, quantity, filled_quantity,
                             limit_price, stop_price, status, reject_reason, placed_at, expires_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING id, portfolio_id, security_id, side, order_type, quantity, filled_quantity,
                   limit_price, stop_price, status, reject_reason, placed_at, expires_at, updated_at",
    )
    .bind(order.id)
    .bind(order.portfolio_id)
    .bind(order.security_id)
    .bind(&order.side)
    .bind(&order.order_type)
    .bind(&order.quantity)
    .bind(&order.filled_quantity)
    .bind(&order.limit_price)
    .bind(&order.stop_price)
    .bind(&order.status)
    .bind(&order.reject_reason)
    .bind(order.placed_at)
    .bind(order.expires_at)
    .bind(order.updated_at)
    .fetch_one(exec)
    .await
}

pub async fn fetch_one(exec: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(id)
        .fetch_optional(exec)
        .await
}

pub async fn fetch_by_portfolio(pool: &PgPool, portfolio_id: Uuid) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE portfolio_id = $1 ORDER BY placed_at DESC"
    ))
    .bind(portfolio_id)
    .fetch_all(pool)
    .await
}

/// Applies a fill's progress to the order row. The `from` guard mirrors
/// `transition`: a row already moved out of an active status is left alone
/// and `None` comes back.
pub async fn update_fill(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    filled_quantity: &BigDecimal,
    from: &[&str],
    status: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "UPDATE orders SET filled_quantity = $2, status = $3, updated_at = now()
         WHERE id = $1 AND status = ANY($4)
         RETURNING id, portfolio_id, security_id, side, order_type, quantity, filled_quantity,
                   limit_price, stop_price, status, reject_reason, placed_at, expires_at, updated_at",
    )
    .bind(id)
    .bind(filled_quantity)
    .bind(status)
    .bind(from.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    .fetch_optional(exec)
    .await
}

/// Moves an order to a new status. The `from` guard keeps the sweep and
/// concurrent cancels from clobbering a terminal state.
pub async fn transition(
    exec: impl PgExecutor<'_>,
    id: Uuid,
    from: &[&str],
    to: &str,
    reason: Option<&str>,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $2, reject_reason = COALESCE($3, reject_reason), updated_at = now()
         WHERE id = $1 AND status = ANY($4)
         RETURNING id, portfolio_id, security_id, side, order_type, quantity, filled_quantity,
                   limit_price, stop_price, status, reject_reason, placed_at, expires_at, updated_at",
    )
    .bind(id)
    .bind(to)
    .bind(reason)
    .bind(from.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    .fetch_optional(exec)
    .await
}

/// Active orders whose expiry has passed, for the expiry sweep.
pub async fn fetch_expired(
    pool: &PgPool,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders
         WHERE status IN ('PENDING', 'PARTIALLY_FILLED') AND expires_at IS NOT NULL AND expires_at <= $1
         ORDER BY expires_at"
    ))
    .bind(now)
    .fetch_all(pool)
    .await
}
